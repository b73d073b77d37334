use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::{errors::AppResult, services::quiz_service::QuizService};

/// Background task that unpublishes quizzes whose window has closed.
pub struct ExpirySweeper {
    quizzes: Arc<QuizService>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(quizzes: Arc<QuizService>, interval_secs: u64) -> Self {
        Self {
            quizzes,
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }

    pub async fn run_once(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.quizzes.sweep_expired(now).await
    }

    /// Should be called once at startup. A failed sweep is logged and the
    /// next tick retries.
    pub fn spawn(self) -> JoinHandle<()> {
        log::info!("Starting quiz expiry sweeper every {:?}", self.interval);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(err) = self.run_once(Utc::now()).await {
                    log::error!("Quiz expiry sweep failed: {}", err);
                }
            }
        })
    }
}
