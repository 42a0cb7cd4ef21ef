//! # Cash Dispensing
//!
//! One handler per note denomination, largest first. Each dispenses as many
//! of its notes as fit and forwards the rest:
//!
//! ```text
//!   8700 ──▶ [2000] ──700──▶ [500] ──200──▶ [100] ──▶ 0
//!            4 notes          1 note          2 notes
//! ```
//!
//! Whatever the last handler cannot dispense is reported back, never
//! silently dropped.

use std::fmt;

use behavior_core::{Chain, ChainBuilder, Dispatch, Handler, Portion, Split};
use serde::{Deserialize, Serialize};

use crate::config::DispenserConfig;
use crate::CatalogError;

/// Notes of one denomination handed out together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteBundle {
    pub denomination: u64,
    pub count: u64,
}

impl NoteBundle {
    /// Value of the bundle.
    pub fn total(&self) -> u64 {
        self.denomination.saturating_mul(self.count)
    }
}

impl fmt::Display for NoteBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.count, self.denomination)
    }
}

// ============================================================================
// Handler
// ============================================================================

/// Dispenses the largest multiple of one denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteDispenser {
    denomination: u64,
}

impl NoteDispenser {
    /// `denomination` must be non-zero; [`DispenserConfig::validate`] checks
    /// this before an [`Atm`] is built.
    pub fn new(denomination: u64) -> Self {
        Self { denomination }
    }

    pub fn denomination(&self) -> u64 {
        self.denomination
    }
}

impl Handler<u64> for NoteDispenser {
    type Portion = NoteBundle;

    fn label(&self) -> String {
        format!("{} note", self.denomination)
    }

    fn take(&self, amount: u64) -> Split<u64, NoteBundle> {
        let count = amount.checked_div(self.denomination).unwrap_or(0);
        if count == 0 {
            return Split::pass(amount);
        }
        let bundle = NoteBundle {
            denomination: self.denomination,
            count,
        };
        Split::took(bundle, amount - bundle.total())
    }
}

// ============================================================================
// ATM
// ============================================================================

/// A completed withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub amount: u64,
    pub bundles: Vec<NoteBundle>,
}

impl Withdrawal {
    /// Total number of notes.
    pub fn note_count(&self) -> u64 {
        self.bundles.iter().map(|b| b.count).sum()
    }
}

/// A dispenser chain assembled from configuration.
///
/// # Example
///
/// ```
/// use behavior_catalog::{Atm, CatalogError};
///
/// let atm = Atm::standard().unwrap();
/// let withdrawal = atm.withdraw(8700).unwrap();
/// let counts: Vec<_> = withdrawal.bundles.iter().map(|b| (b.denomination, b.count)).collect();
/// assert_eq!(counts, vec![(2000, 4), (500, 1), (100, 2)]);
///
/// assert!(matches!(atm.withdraw(8753), Err(CatalogError::CannotDispense { remainder: 53, .. })));
/// ```
#[derive(Debug)]
pub struct Atm {
    chain: Chain<u64, NoteBundle>,
}

impl Atm {
    /// Build the chain in the configured order.
    pub fn new(config: &DispenserConfig) -> Result<Self, CatalogError> {
        config.validate()?;
        let chain = config
            .denominations
            .iter()
            .fold(ChainBuilder::new(), |builder, &d| {
                builder.then(NoteDispenser::new(d))
            })
            .build()?;

        tracing::debug!(handlers = ?chain.labels(), "atm ready");
        Ok(Self { chain })
    }

    /// The reference `[2000, 500, 100]` dispenser.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(&DispenserConfig::default())
    }

    pub fn chain(&self) -> &Chain<u64, NoteBundle> {
        &self.chain
    }

    /// Run the chain and return every step, satisfied or not.
    pub fn plan(&self, amount: u64) -> Dispatch<u64, NoteBundle> {
        self.chain.dispatch(amount)
    }

    /// Dispense `amount`, or fail with the part no denomination covers.
    pub fn withdraw(&self, amount: u64) -> Result<Withdrawal, CatalogError> {
        match self.plan(amount).into_result() {
            Ok(portions) => Ok(Withdrawal {
                amount,
                bundles: portions.into_iter().map(|p: Portion<NoteBundle>| p.value).collect(),
            }),
            Err(unsatisfiable) => Err(CatalogError::CannotDispense {
                requested: amount,
                remainder: unsatisfiable.remainder,
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
