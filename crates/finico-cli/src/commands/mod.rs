pub mod budget;
pub mod forecast;
pub mod goal;
pub mod loan;
pub mod monte_carlo;
pub mod rates;
