//! Anomaly state: the single source of truth the actuator reads.
//!
//! [`AnomalyState`] combines two independent axes:
//!
//! ```text
//!   condition : { None, Fire, Leakage }        written by classifiers, cleared by reset
//!   override  : { enabled, desired_on }        written by the override endpoint
//! ```
//!
//! Both live in one struct owned by the
//! [`NodeService`](crate::app::service::NodeService) and are only mutated
//! through `&mut self` methods, so a handler's writes are always observed
//! together by the actuator tick.
//!
//! Classifiers never assign the condition directly.  They call
//! [`AnomalyState::classify`] with the variant they own, and the configured
//! [`PrecedencePolicy`] decides what happens when another classifier's
//! variant is currently asserted.

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// The currently asserted anomaly.  Exactly one variant holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnomalyCondition {
    #[default]
    None,
    Fire,
    Leakage,
}

impl AnomalyCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fire => "fire",
            Self::Leakage => "leakage",
        }
    }
}

/// Operator override of the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverrideState {
    /// `false` = follow the anomaly condition.
    pub enabled: bool,
    /// Forced output when `enabled`: `true` = warning on, `false` = all off.
    pub desired_on: bool,
}

/// How a classifier's update interacts with a condition owned by a
/// different classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrecedencePolicy {
    /// Every update overwrites the condition: asserting sets the owned
    /// variant, not asserting sets `None`.  Foreign overwrites are logged.
    #[default]
    LastWriterWins,
    /// Asserting still overwrites, but a classifier may only clear its
    /// own variant; a below-threshold update leaves a foreign variant set.
    OwnerScoped,
}

/// Combined condition + override record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnomalyState {
    condition: AnomalyCondition,
    override_state: OverrideState,
    policy: PrecedencePolicy,
}

impl AnomalyState {
    pub fn new(policy: PrecedencePolicy) -> Self {
        Self {
            condition: AnomalyCondition::None,
            override_state: OverrideState::default(),
            policy,
        }
    }

    pub fn condition(&self) -> AnomalyCondition {
        self.condition
    }

    pub fn override_state(&self) -> OverrideState {
        self.override_state
    }

    pub fn policy(&self) -> PrecedencePolicy {
        self.policy
    }

    /// Apply one classifier decision.
    ///
    /// `owned` is the variant the calling classifier is allowed to assert;
    /// passing `AnomalyCondition::None` is a logic error and is ignored.
    /// Returns the previous condition if it changed.
    pub fn classify(&mut self, owned: AnomalyCondition, asserted: bool) -> Option<AnomalyCondition> {
        if owned == AnomalyCondition::None {
            debug_assert!(false, "classifier must own a concrete variant");
            return None;
        }

        let prev = self.condition;
        let foreign = prev != AnomalyCondition::None && prev != owned;

        let next = if asserted {
            owned
        } else if foreign && self.policy == PrecedencePolicy::OwnerScoped {
            prev
        } else {
            AnomalyCondition::None
        };

        if foreign && next != prev {
            warn!(
                "anomaly: {} overwrites {} set by another classifier ({:?})",
                next.as_str(),
                prev.as_str(),
                self.policy
            );
        }

        self.set_condition(next)
    }

    /// Clear the condition (reset button).  Returns the previous condition
    /// if it changed.
    pub fn reset(&mut self) -> Option<AnomalyCondition> {
        self.set_condition(AnomalyCondition::None)
    }

    /// Force the indicator on/off regardless of the condition.
    pub fn set_override(&mut self, desired_on: bool) {
        self.override_state = OverrideState { enabled: true, desired_on };
        info!("anomaly: override enabled (desired_on={})", desired_on);
    }

    /// Return to following the condition.
    pub fn clear_override(&mut self) {
        if self.override_state.enabled {
            info!("anomaly: override cleared");
        }
        self.override_state = OverrideState::default();
    }

    fn set_condition(&mut self, next: AnomalyCondition) -> Option<AnomalyCondition> {
        let prev = self.condition;
        if prev == next {
            return None;
        }
        self.condition = next;
        info!("anomaly: {} -> {}", prev.as_str(), next.as_str());
        Some(prev)
    }
}
