pub mod runner;
pub mod supervisor;

pub use runner::{PairRunner, PairSummary};
pub use supervisor::{FanOutReport, PairFailure, Supervisor};
