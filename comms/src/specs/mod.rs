pub mod partial;
pub mod training;
pub mod worker;
