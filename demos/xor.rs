use sigma_nn::{vanilla_gradient_descent, Example, Network};

fn main() -> sigma_nn::Result<()> {
    tracing_subscriber::fmt().init();

    let mut network = Network::seeded(&[2, 3, 1], 42)?;

    let data = vec![
        Example::new(vec![1.0, 1.0], vec![0.0]),
        Example::new(vec![0.0, 1.0], vec![1.0]),
        Example::new(vec![1.0, 0.0], vec![1.0]),
        Example::new(vec![0.0, 0.0], vec![0.0]),
    ];

    let history = vanilla_gradient_descent(&mut network, &data, 2000, 3.0, None, Some(42))?;

    for (epoch, loss) in history.losses.iter().enumerate().step_by(200) {
        println!("Epoch {epoch}: loss = {loss:.6}");
    }

    for example in &data {
        let output = network.evaluate(&example.input)?[0];
        println!("Input: {:?} -> Output: {output:.4}", example.input);
    }
    Ok(())
}
