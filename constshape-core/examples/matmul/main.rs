use constshape_core::{DType, DynTensor, Matrix, Tensor, R2};
use std::time::Instant;

fn bench<T: DType, const M: usize, const K: usize, const N: usize>(type_name: &str) {
    // Number of times to run the matmul for averaging
    let iterations = 100;
    let mut total = std::time::Duration::new(0, 0);

    let a = Tensor::<R2<M, K>, T>::full(T::from_f64(1.));
    let b = Tensor::<R2<N, K>, T>::full(T::from_f64(2.)).transpose();

    for _ in 0..iterations {
        let start = Instant::now();
        let c: Matrix<M, N, T> = std::hint::black_box(a.matmul(&b));
        total += start.elapsed();
        assert_eq!(c.shape(), vec![M, N]);
    }

    let avg = total / (iterations as u32);
    println!("Average execution time for {type_name} over {iterations} iterations: {avg:?}");
}

fn main() {
    const M: usize = 8;
    const K: usize = 4;
    const N: usize = 8;

    bench::<f32, M, K, N>("f32");
    bench::<i32, M, K, N>("i32");

    // Shapes only known at run time are checked when the operation is called.
    let a = DynTensor::<f32>::new(vec![vec![1.0; 3]; 2]).unwrap();
    match a.matmul(&a) {
        Ok(c) => println!("{c:?}"),
        Err(e) => println!("rejected: {e}"),
    }
}
