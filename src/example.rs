//! Example, label and prediction records exchanged with the base learner.
//!
//! The offset tree never looks at features: `Example<F>` carries them as an opaque
//! payload for the base learner. What the tree does touch is the label, the
//! importance weight and the prediction slot, which it temporarily overwrites
//! while routing and training. [`ScopedExample`] puts them back.

use std::ops::{Deref, DerefMut};

/// One candidate action of a bandit label.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CbClass {
    /// 1-based action id.
    pub action: u32,
    /// Observed cost of the action.
    pub cost: f64,
    /// Probability with which the logging policy chose the action.
    pub probability: f64,
}

/// Cost-sensitive bandit label: ordered candidate actions.
///
/// The offset tree reads only the first and the last entry.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CbLabel {
    pub costs: Vec<CbClass>,
}

impl CbLabel {
    /// Label with a single observed action.
    pub fn single(action: u32, cost: f64, probability: f64) -> Self {
        Self {
            costs: vec![CbClass {
                action,
                cost,
                probability,
            }],
        }
    }
}

/// Binary label handed to the base learner at one node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleLabel {
    /// `-1.0` (left) or `+1.0` (right); [`SimpleLabel::TEST`] marks inference.
    pub label: f64,
    /// Initial prediction offset.
    pub initial: f64,
}

impl SimpleLabel {
    /// Inference-only marker: the base learner must not train on it.
    pub const TEST: SimpleLabel = SimpleLabel {
        label: f64::MAX,
        initial: 0.0,
    };

    pub fn is_test(&self) -> bool {
        self.label == f64::MAX
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Label {
    CostSensitive(CbLabel),
    Simple(SimpleLabel),
}

impl Default for Label {
    fn default() -> Self {
        Label::CostSensitive(CbLabel::default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prediction {
    /// Scalar output of the last base-learner call.
    pub scalar: f64,
    /// 1-based action chosen by the tree (`0` when no tree is configured).
    pub action: u32,
}

/// An example flowing through the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Example<F> {
    pub features: F,
    pub label: Label,
    /// Importance weight.
    pub weight: f64,
    pub prediction: Prediction,
}

impl<F> Example<F> {
    pub fn new(features: F, label: Label) -> Self {
        Self {
            features,
            label,
            weight: 1.0,
            prediction: Prediction::default(),
        }
    }

    /// Example carrying a bandit label.
    pub fn with_costs(features: F, label: CbLabel) -> Self {
        Self::new(features, Label::CostSensitive(label))
    }

    /// The bandit label, if this example carries one.
    pub fn cb_label(&self) -> Option<&CbLabel> {
        match &self.label {
            Label::CostSensitive(cb) => Some(cb),
            Label::Simple(_) => None,
        }
    }
}

/// Guard over a caller-owned example.
///
/// Captures the label, weight and prediction on creation and writes them back on
/// drop, including during unwinding out of a panicking base learner.
pub(crate) struct ScopedExample<'a, F> {
    ex: &'a mut Example<F>,
    saved_label: Label,
    saved_weight: f64,
    saved_prediction: Prediction,
}

impl<'a, F> ScopedExample<'a, F> {
    pub(crate) fn new(ex: &'a mut Example<F>) -> Self {
        let saved_label = ex.label.clone();
        let saved_weight = ex.weight;
        let saved_prediction = ex.prediction;
        Self {
            ex,
            saved_label,
            saved_weight,
            saved_prediction,
        }
    }
}

impl<F> Deref for ScopedExample<'_, F> {
    type Target = Example<F>;

    fn deref(&self) -> &Example<F> {
        &*self.ex
    }
}

impl<F> DerefMut for ScopedExample<'_, F> {
    fn deref_mut(&mut self) -> &mut Example<F> {
        &mut *self.ex
    }
}

impl<F> Drop for ScopedExample<'_, F> {
    fn drop(&mut self) {
        self.ex.label = std::mem::take(&mut self.saved_label);
        self.ex.weight = self.saved_weight;
        self.ex.prediction = self.saved_prediction;
    }
}
