//! Conversion from mdarray tensors to nalgebra matrices
//!
//! The public API takes `DTensor<f64, 2>`; dense eigenvalue computation
//! runs on nalgebra.

use mdarray::DTensor;
use nalgebra::DMatrix;

/// Copy a 2-D tensor into a column-major nalgebra matrix
pub fn tensor_to_dmatrix(tensor: &DTensor<f64, 2>) -> DMatrix<f64> {
    let (m, n) = *tensor.shape();
    DMatrix::from_fn(m, n, |i, j| tensor[[i, j]])
}
