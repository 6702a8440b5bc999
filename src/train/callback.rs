use crate::error::Result;
use crate::train::epoch_stats::EpochMetrics;

/// Hook invoked synchronously by the training loop after every epoch.
///
/// The loop does not start the next epoch until this returns, so `model` is
/// never observed mid-update. Returning an error aborts training and the error
/// propagates out of `ModelService::train`.
pub trait EpochCallback<M> {
    fn on_epoch_end(&mut self, model: &M, metrics: &EpochMetrics) -> Result<()>;
}

impl<M, F> EpochCallback<M> for F
where
    F: FnMut(&M, &EpochMetrics) -> Result<()>,
{
    fn on_epoch_end(&mut self, model: &M, metrics: &EpochMetrics) -> Result<()> {
        self(model, metrics)
    }
}
