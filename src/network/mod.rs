pub mod evaluation;
pub mod gradients;
pub mod network;
pub mod persist;
pub mod spec;

pub use evaluation::{Classification, CorrectPrediction, Misclassification};
pub use gradients::Gradients;
pub use network::Network;
pub use spec::NetworkSpec;
