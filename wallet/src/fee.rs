//! Pluggable fee policies.

use vesta_types::Amount;

/// The shape of a transaction, as far as fees care: how many inputs it
/// consumes and how many outputs it creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxShape {
    pub inputs: usize,
    pub outputs: usize,
}

/// Computes the fee charged for settling a transaction of a given shape.
pub trait FeePolicy: Send + Sync {
    fn compute_fee(&self, shape: &TxShape) -> Amount;
}

/// No fees. Used by zero-fee network configurations and most tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroFeePolicy;

impl FeePolicy for ZeroFeePolicy {
    fn compute_fee(&self, _shape: &TxShape) -> Amount {
        Amount::ZERO
    }
}

/// Linear fee: `base + coefficient × (inputs + outputs)`.
#[derive(Clone, Copy, Debug)]
pub struct LinearFeePolicy {
    pub base: Amount,
    pub coefficient: Amount,
}

impl LinearFeePolicy {
    pub fn new(base: Amount, coefficient: Amount) -> Self {
        Self { base, coefficient }
    }
}

impl FeePolicy for LinearFeePolicy {
    fn compute_fee(&self, shape: &TxShape) -> Amount {
        let units = (shape.inputs + shape.outputs) as u128;
        let variable = self.coefficient.raw().saturating_mul(units);
        Amount::new(self.base.raw().saturating_add(variable))
    }
}
