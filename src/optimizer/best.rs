use num_bigint::BigUint;
use tracing::{debug, warn};

use crate::error::{SlsError, SlsResult};
use crate::model::Model;
use crate::tracker::{HardTracker, ObjectiveTracker};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestModel {
    pub score: BigUint,
    pub model: Model,
}

/// Best model seen during one optimize call. Its score never decreases.
#[derive(Debug, Default)]
pub struct BestModelCache {
    best: Option<BestModel>,
}

impl BestModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&BestModel> {
        self.best.as_ref()
    }

    pub fn score(&self) -> Option<&BigUint> {
        self.best.as_ref().map(|b| &b.score)
    }

    /// True when `score` strictly beats the cached one, or nothing is cached.
    pub fn improves(&self, score: &BigUint) -> bool {
        self.score().map_or(true, |best| score > best)
    }

    /// Stores the merged tracker models under `score` if it strictly improves
    /// on the cached score.
    pub fn offer<H, O>(&mut self, hard: &H, objective: &O, score: &BigUint) -> SlsResult<bool>
    where
        H: HardTracker + ?Sized,
        O: ObjectiveTracker + ?Sized,
    {
        if !self.improves(score) {
            return Ok(false);
        }
        self.save(hard, objective, score)?;
        Ok(true)
    }

    /// Unconditionally replaces the cached model.
    pub fn save<H, O>(&mut self, hard: &H, objective: &O, score: &BigUint) -> SlsResult<()>
    where
        H: HardTracker + ?Sized,
        O: ObjectiveTracker + ?Sized,
    {
        let model = merge_models(hard.model(), &objective.model())?;
        debug!(%score, "saved best model");
        self.best = Some(BestModel {
            score: score.clone(),
            model,
        });
        Ok(())
    }
}

/// Merges the objective tracker's model into the hard tracker's. Shared
/// variables must agree.
pub fn merge_models(mut hard: Model, objective: &Model) -> SlsResult<Model> {
    for (id, value) in objective.iter() {
        match hard.get(id) {
            Some(existing) if existing != value => {
                warn!(var = %id, hard = %existing, objective = %value, "model disagreement");
                return Err(SlsError::ModelDisagreement {
                    var: id.to_string(),
                    hard: existing.to_string(),
                    objective: value.to_string(),
                });
            }
            Some(_) => {}
            None => hard.insert_raw(id, value.clone()),
        }
    }
    Ok(hard)
}
