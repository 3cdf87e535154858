pub mod day_of_year;
pub mod location;
pub mod variable;
