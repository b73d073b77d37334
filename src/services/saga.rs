//! Ordered steps with compensations that unwind in reverse on the first
//! failure. Used wherever one logical operation spans the credential store
//! and the table store.

use std::future::Future;

use futures::future::BoxFuture;

use crate::errors::AppResult;

pub type Compensation = BoxFuture<'static, AppResult<()>>;

pub struct Saga {
    name: &'static str,
    compensations: Vec<(&'static str, Compensation)>,
}

impl Saga {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            compensations: Vec::new(),
        }
    }

    /// Runs a step that has nothing to undo.
    pub async fn run<T, F>(&mut self, step: &'static str, action: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match action.await {
            Ok(value) => Ok(value),
            Err(err) => {
                log::warn!("{}: step '{}' failed: {}", self.name, step, err);
                self.unwind().await;
                Err(err)
            }
        }
    }

    /// Runs a step and, if it succeeds, registers how to undo it.
    pub async fn run_compensated<T, F, C>(
        &mut self,
        step: &'static str,
        action: F,
        compensate: C,
    ) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
        C: FnOnce(&T) -> Compensation,
    {
        let value = self.run(step, action).await?;
        self.compensations.push((step, compensate(&value)));
        Ok(value)
    }

    /// Drops the registered compensations; the operation is durable.
    pub fn complete(self) {
        log::debug!("{}: completed", self.name);
    }

    async fn unwind(&mut self) {
        while let Some((step, compensation)) = self.compensations.pop() {
            match compensation.await {
                Ok(()) => log::info!("{}: compensated step '{}'", self.name, step),
                Err(err) => log::error!(
                    "{}: compensation for step '{}' failed: {}",
                    self.name,
                    step,
                    err
                ),
            }
        }
    }
}
