pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;
pub mod data;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use activation::Sigmoid;
pub use layers::dense::Layer;
pub use loss::QuadraticLoss;
pub use network::{Classification, Gradients, Network, NetworkSpec};
pub use optim::sgd::Sgd;
pub use data::Example;
pub use train::{
    minibatch_gradient_descent, stochastic_gradient_descent, train_loop, vanilla_gradient_descent,
    EpochStats, Schedule, TrainConfig, TrainingHistory,
};
