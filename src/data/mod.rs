pub mod example;
pub mod idx;
pub mod mnist;

pub use example::Example;
pub use mnist::{class_subset, load_mnist, MnistData};
