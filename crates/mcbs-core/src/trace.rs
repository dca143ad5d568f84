//! Fixed-horizon per-arm traces.
//!
//! Every time-indexed record of a run (actions, returns, predictive density,
//! posterior snapshots) is an [`ArmMatrix`] allocated for the whole horizon
//! up front. Storage is time-major so the K values of one step are a
//! contiguous slice.

use serde::{Deserialize, Serialize};

/// Dense `arms x steps` matrix of `f64`, stored time-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmMatrix {
    arms: usize,
    steps: usize,
    data: Vec<f64>,
}

impl ArmMatrix {
    /// Zero-filled matrix.
    pub fn zeros(arms: usize, steps: usize) -> Self {
        Self {
            arms,
            steps,
            data: vec![0.0; arms * steps],
        }
    }

    pub fn arms(&self) -> usize {
        self.arms
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn get(&self, arm: usize, t: usize) -> f64 {
        self.data[self.index(arm, t)]
    }

    pub fn set(&mut self, arm: usize, t: usize, value: f64) {
        let i = self.index(arm, t);
        self.data[i] = value;
    }

    /// Values of all arms at step `t`.
    pub fn column(&self, t: usize) -> &[f64] {
        assert!(t < self.steps, "step {t} outside horizon {}", self.steps);
        &self.data[t * self.arms..(t + 1) * self.arms]
    }

    pub fn column_mut(&mut self, t: usize) -> &mut [f64] {
        assert!(t < self.steps, "step {t} outside horizon {}", self.steps);
        &mut self.data[t * self.arms..(t + 1) * self.arms]
    }

    /// Overwrite step `t` with `values` (one per arm).
    pub fn write_column(&mut self, t: usize, values: &[f64]) {
        assert_eq!(values.len(), self.arms, "column length must equal arm count");
        self.column_mut(t).copy_from_slice(values);
    }

    /// Per-arm totals over all steps.
    pub fn row_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.arms];
        for column in self.data.chunks_exact(self.arms.max(1)) {
            for (s, v) in sums.iter_mut().zip(column) {
                *s += v;
            }
        }
        sums
    }

    pub fn column_sum(&self, t: usize) -> f64 {
        self.column(t).iter().sum()
    }

    fn index(&self, arm: usize, t: usize) -> usize {
        assert!(
            arm < self.arms && t < self.steps,
            "({arm}, {t}) outside {}x{}",
            self.arms,
            self.steps
        );
        t * self.arms + arm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_contiguous_per_step() {
        let mut m = ArmMatrix::zeros(3, 2);
        m.write_column(1, &[0.1, 0.2, 0.7]);
        assert_eq!(m.column(1), &[0.1, 0.2, 0.7]);
        assert_eq!(m.column(0), &[0.0, 0.0, 0.0]);
        assert!((m.get(2, 1) - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn per_arm_and_per_step_sums() {
        let mut m = ArmMatrix::zeros(2, 3);
        m.set(0, 0, 1.0);
        m.set(1, 1, 1.0);
        m.set(1, 2, 1.0);
        assert_eq!(m.row_sums(), vec![1.0, 2.0]);
        assert!((m.column_sum(2) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_horizon_panics() {
        let m = ArmMatrix::zeros(2, 2);
        m.get(0, 2);
    }

    #[test]
    fn zero_steps_is_empty() {
        let m = ArmMatrix::zeros(4, 0);
        assert_eq!(m.row_sums(), vec![0.0; 4]);
    }
}
