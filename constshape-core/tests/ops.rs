use constshape_core::{Matrix, Tensor, Vector, R1, R2, R3};

macro_rules! test_ops_dtype {
    ($dtype:ty, $dtype_mod:ident) => {
        mod $dtype_mod {
            use super::*;

            fn m23() -> Matrix<2, 3, $dtype> {
                Tensor::from_fn(|i| (i + 1) as $dtype)
            }

            #[test]
            fn flatten_matrix() {
                let v: Vector<6, $dtype> = m23().flatten();
                assert_eq!(v.to_vec(), [1, 2, 3, 4, 5, 6].map(|x| x as $dtype).to_vec());
            }

            #[test]
            fn flatten_rank3() {
                let t = Tensor::<R3<2, 3, 4>, $dtype>::from_fn(|i| (i + 1) as $dtype);
                let v: Vector<24, $dtype> = t.flatten();
                let expected: Vec<$dtype> = (1..=24).map(|x| x as $dtype).collect();
                assert_eq!(v.to_vec(), expected);
            }

            #[test]
            fn concat() {
                let a = Tensor::<R1<1>, $dtype>::full(20 as $dtype);
                let b = Tensor::<R1<4>, $dtype>::from_fn(|i| (i + 1) as $dtype);
                let c: Vector<5, $dtype> = a.concat(&b);
                assert_eq!(c.into_data(), [20, 1, 2, 3, 4].map(|x| x as $dtype));
            }

            #[test]
            fn dot() {
                let a = Tensor::<R1<3>, $dtype>::new([1 as $dtype, 2 as $dtype, 3 as $dtype]);
                let b = Tensor::<R1<3>, $dtype>::new([4 as $dtype, 5 as $dtype, 6 as $dtype]);
                assert_eq!(a.dot(&b).value(), 32 as $dtype);
                assert_eq!(a.dot(&b), b.dot(&a));
            }

            #[test]
            fn outer() {
                let a = Tensor::<R1<2>, $dtype>::new([1 as $dtype, 2 as $dtype]);
                let b = Tensor::<R1<2>, $dtype>::new([3 as $dtype, 4 as $dtype]);
                let m = a.outer(&b);
                assert_eq!(m.into_data(), [[3, 4], [6, 8]].map(|r| r.map(|x| x as $dtype)));
            }

            #[test]
            fn transpose() {
                let t = m23().transpose();
                assert_eq!(t.into_data(), [[1, 4], [2, 5], [3, 6]].map(|r| r.map(|x| x as $dtype)));
                assert_eq!(m23().transpose().transpose(), m23());
            }

            #[test]
            fn matmul() {
                let a = m23();
                let b = a.transpose();
                let c: Matrix<2, 2, $dtype> = a.matmul(&b);
                assert_eq!(c.into_data(), [[14, 32], [32, 77]].map(|r| r.map(|x| x as $dtype)));
            }

            #[test]
            fn batched_matmul() {
                let a = Tensor::<R3<2, 2, 3>, $dtype>::from_fn(|i| (i % 6 + 1) as $dtype);
                let b = Tensor::<R3<2, 3, 2>, $dtype>::new([m23().transpose().into_data(); 2]);
                let c = a.matmul(&b);
                let expected = [[14, 32], [32, 77]].map(|r| r.map(|x| x as $dtype));
                assert_eq!(c.into_data(), [expected; 2]);
            }

            #[test]
            fn elementwise() {
                let a = Tensor::<R2<2, 2>, $dtype>::full(3 as $dtype);
                let b = Tensor::<R2<2, 2>, $dtype>::full(2 as $dtype);
                assert_eq!((a + b).into_data(), [[5 as $dtype; 2]; 2]);
                assert_eq!((a * b).into_data(), [[6 as $dtype; 2]; 2]);
                assert_eq!((a - b).into_data(), [[1 as $dtype; 2]; 2]);
            }
        }
    };
}

test_ops_dtype!(f32, f32_ops);
test_ops_dtype!(f64, f64_ops);
test_ops_dtype!(i32, i32_ops);
test_ops_dtype!(i64, i64_ops);
test_ops_dtype!(u32, u32_ops);

#[test]
fn matmul_shapes() {
    let a = Tensor::<R2<4, 3>, f32>::ones();
    let b = Tensor::<R2<3, 5>, f32>::ones();
    let c = a.matmul(&b);
    assert_eq!(c.shape(), vec![4, 5]);
    assert_eq!(c.into_data(), [[3.0; 5]; 4]);
}

#[test]
fn flatten_scalar() {
    let s = Tensor::<constshape_core::R0, i32>::scalar(9);
    let v: Vector<1, i32> = s.flatten();
    assert_eq!(v.into_data(), [9]);
}

#[test]
fn flatten_len_is_product() {
    let t = Tensor::<R3<3, 1, 5>, u8>::zeros();
    let v: Vector<15, u8> = t.flatten();
    assert_eq!(v.to_vec().len(), 15);
}

#[test]
fn concat_preserves_order() {
    let a = Tensor::<R1<3>, i32>::new([3, 1, 2]);
    let b = Tensor::<R1<2>, i32>::new([3, 3]);
    let c: Vector<5, i32> = a.concat(&b);
    assert_eq!(c.into_data(), [3, 1, 2, 3, 3]);
}

#[test]
fn dot_accumulates_from_zero() {
    let a = Tensor::<R1<1>, f64>::new([-2.5]);
    assert_eq!(a.dot(&a).value(), 6.25);
}

#[test]
fn map_and_cast() {
    let a = Tensor::<R2<2, 2>, i32>::new([[1, -2], [3, -4]]);
    let doubled = a.map(|x| x * 2);
    assert_eq!(doubled.into_data(), [[2, -4], [6, -8]]);
    let f = a.cast::<f32>();
    assert_eq!(f.into_data(), [[1.0, -2.0], [3.0, -4.0]]);
}

#[test]
fn operations_leave_inputs_untouched() {
    let a = Tensor::<R2<2, 3>, i32>::new([[1, 2, 3], [4, 5, 6]]);
    let _ = a.transpose();
    let _ = a + a;
    assert_eq!(a.into_data(), [[1, 2, 3], [4, 5, 6]]);
}
