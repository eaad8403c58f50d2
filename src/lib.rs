pub mod config;
pub mod data_association;
pub mod error;
pub mod gate;
pub mod object;
pub mod polygon;
pub mod solver;

pub use config::AssocConfig;
pub use data_association::DataAssociation;
pub use error::AssocError;
pub use object::ObjectView;
pub use polygon::Polygon;
pub use solver::{GnnSolver, Ssp};
