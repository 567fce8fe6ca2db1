use constshape_core::{Tensor, Vector, R1, R2};

fn main() {
    let m = Tensor::<R2<2, 3>, f32>::new([[1., 2., 3.], [4., 5., 6.]]);
    let flat: Vector<6, f32> = m.flatten();

    let head = Tensor::<R1<1>, f32>::full(20.);
    let joined: Vector<7, f32> = head.concat(&flat);

    println!("{m:?}");
    println!("{joined:?}");
    println!("{:?}", m.transpose());
}
