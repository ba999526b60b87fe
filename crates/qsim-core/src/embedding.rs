//! Embedding a k-qubit gate into an n-qubit register.
//!
//! A gate acting on targets `[t0, …, tk-1]` sees a local index whose most
//! significant bit is qubit `t0`. The full-register operator is identity on
//! every other qubit, so entry `(r, c)` equals `U[project(r), project(c)]`
//! when `r` and `c` agree outside the target bits and zero otherwise.
//!
//! Three realizations are provided and agree within rounding:
//!
//! - [`Embedding::dense_by_kron`]: `I ⊗ U ⊗ I` for contiguous ascending targets
//! - [`Embedding::dense_by_projection`]: the general entry-wise construction
//! - [`Embedding::apply`]: in-place application on the amplitude slice,
//!   touching each group of `2^k` amplitudes once without materializing
//!   the `2^n × 2^n` operator

use num_complex::Complex64;

use crate::error::{QsimError, QsimResult};
use crate::unitary::{self, Matrix};

/// Largest register for which a dense `2^n × 2^n` operator is built.
pub const MAX_DENSE_QUBITS: usize = 12;

/// A validated placement of a k-qubit gate on an n-qubit register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedding {
    num_qubits: usize,
    targets: Vec<usize>,
    /// `offsets[l]` is the register index contribution of local index `l`.
    offsets: Vec<usize>,
    /// All target bits set.
    target_mask: usize,
}

impl Embedding {
    /// Validate `targets` for a gate of `arity` on `num_qubits` qubits.
    ///
    /// Fails if the target count differs from the arity, an index is out of
    /// range or an index repeats. `gate_name` is only used in error messages.
    pub fn new(
        arity: usize,
        targets: &[usize],
        num_qubits: usize,
        gate_name: &str,
    ) -> QsimResult<Self> {
        if targets.len() != arity {
            return Err(QsimError::ArityMismatch {
                gate_name: gate_name.to_string(),
                expected: arity,
                got: targets.len(),
            });
        }

        let mut target_mask = 0usize;
        for &qubit in targets {
            if qubit >= num_qubits {
                return Err(QsimError::QubitOutOfRange {
                    qubit,
                    num_qubits,
                    gate_name: Some(gate_name.to_string()),
                });
            }
            let bit = bit_of(qubit, num_qubits);
            if target_mask & bit != 0 {
                return Err(QsimError::DuplicateQubit {
                    qubit,
                    gate_name: Some(gate_name.to_string()),
                });
            }
            target_mask |= bit;
        }

        let k = targets.len();
        let offsets = (0..1usize << k)
            .map(|local| {
                targets
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| (local >> (k - 1 - j)) & 1 == 1)
                    .fold(0, |acc, (_, &t)| acc | bit_of(t, num_qubits))
            })
            .collect();

        Ok(Self {
            num_qubits,
            targets: targets.to_vec(),
            offsets,
            target_mask,
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn arity(&self) -> usize {
        self.targets.len()
    }

    /// Register index bits selected by gate-local index `local`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Gate-local index of register index `index`.
    pub fn project(&self, index: usize) -> usize {
        let k = self.targets.len();
        self.targets
            .iter()
            .enumerate()
            .fold(0, |acc, (j, &t)| {
                let bit = (index >> (self.num_qubits - 1 - t)) & 1;
                acc | (bit << (k - 1 - j))
            })
    }

    /// True when the targets are ascending and adjacent, e.g. `[1, 2, 3]`.
    pub fn is_contiguous(&self) -> bool {
        self.targets.windows(2).all(|w| w[1] == w[0] + 1)
    }

    /// `I(2^s) ⊗ U ⊗ I(2^(n-s-k))` for contiguous targets starting at `s`.
    ///
    /// Returns `Ok(None)` when the targets are not contiguous.
    pub fn dense_by_kron(&self, matrix: &Matrix) -> QsimResult<Option<Matrix>> {
        self.check_matrix(matrix)?;
        self.check_dense_size()?;
        if !self.is_contiguous() {
            return Ok(None);
        }
        let start = self.targets[0];
        let after = self.num_qubits - start - self.arity();
        let left = unitary::kron(&unitary::identity(1 << start), matrix);
        Ok(Some(unitary::kron(&left, &unitary::identity(1 << after))))
    }

    /// The full operator for arbitrary target placement.
    pub fn dense_by_projection(&self, matrix: &Matrix) -> QsimResult<Matrix> {
        self.check_matrix(matrix)?;
        self.check_dense_size()?;
        let size = 1usize << self.num_qubits;
        let mut full = Matrix::zeros((size, size));
        for col in 0..size {
            let local_col = self.project(col);
            let rest = col & !self.target_mask;
            for (local_row, &offset) in self.offsets.iter().enumerate() {
                full[[rest | offset, col]] = matrix[[local_row, local_col]];
            }
        }
        Ok(full)
    }

    /// The full operator, via Kronecker products when the targets allow it.
    pub fn dense(&self, matrix: &Matrix) -> QsimResult<Matrix> {
        match self.dense_by_kron(matrix)? {
            Some(full) => Ok(full),
            None => self.dense_by_projection(matrix),
        }
    }

    /// Apply `matrix` to `amplitudes` in place.
    pub fn apply(&self, matrix: &Matrix, amplitudes: &mut [Complex64]) -> QsimResult<()> {
        self.check_matrix(matrix)?;
        let size = 1usize << self.num_qubits;
        if amplitudes.len() != size {
            return Err(QsimError::StateLengthMismatch {
                num_qubits: self.num_qubits,
                expected: size,
                got: amplitudes.len(),
            });
        }

        let dim = self.offsets.len();
        let mut gathered = vec![Complex64::new(0.0, 0.0); dim];
        for base in (0..size).filter(|b| b & self.target_mask == 0) {
            for (slot, &offset) in gathered.iter_mut().zip(&self.offsets) {
                *slot = amplitudes[base | offset];
            }
            for (row, &offset) in self.offsets.iter().enumerate() {
                amplitudes[base | offset] = matrix
                    .row(row)
                    .iter()
                    .zip(&gathered)
                    .map(|(m, a)| m * a)
                    .sum();
            }
        }
        Ok(())
    }

    fn check_matrix(&self, matrix: &Matrix) -> QsimResult<()> {
        let dim = self.offsets.len();
        let (rows, cols) = matrix.dim();
        if rows != dim || cols != dim {
            return Err(QsimError::MatrixShape {
                gate_name: format!("{}-qubit embedding", self.arity()),
                rows,
                cols,
            });
        }
        Ok(())
    }

    fn check_dense_size(&self) -> QsimResult<()> {
        if self.num_qubits > MAX_DENSE_QUBITS {
            return Err(QsimError::RegisterTooLarge {
                num_qubits: self.num_qubits,
                max: MAX_DENSE_QUBITS,
                what: "dense operators",
            });
        }
        Ok(())
    }
}

#[inline]
fn bit_of(qubit: usize, num_qubits: usize) -> usize {
    1 << (num_qubits - 1 - qubit)
}
