use crate::errors::Operator;
use crate::tensor::Tensor;
use std::ops::SubAssign;

impl SubAssign for Tensor {
    fn sub_assign(&mut self, other: Self) {
        self.zip_assign(&other, Operator::SubAssign, |a, b| *a -= b);
    }
}

impl<'a> SubAssign<&'a Self> for Tensor {
    fn sub_assign(&mut self, other: &'a Self) {
        self.zip_assign(other, Operator::SubAssign, |a, b| *a -= b);
    }
}

impl SubAssign<f32> for Tensor {
    fn sub_assign(&mut self, scalar: f32) {
        self.data -= scalar;
    }
}
