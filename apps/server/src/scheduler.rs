//! Background generation of fixed (recurring) expenses.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;
use septic_core::utils::today;

/// Initial delay before the first run, so startup is not slowed by it.
const INITIAL_DELAY_SECS: u64 = 5;

/// Starts the fixed-expense scheduler. Every tick books one expense per
/// elapsed period of each active fixed expense.
pub fn start_fixed_expense_scheduler(state: Arc<AppState>, period: Duration) {
    tokio::spawn(async move {
        info!(
            "Fixed expense scheduler started ({}s interval)",
            period.as_secs()
        );

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_scheduled_generation(&state).await;
        }
    });
}

async fn run_scheduled_generation(state: &Arc<AppState>) {
    let as_of = today();
    match state.fixed_expense_service.generate_due(as_of).await {
        Ok(generated) if generated.is_empty() => {
            debug!("No fixed expenses due on {}", as_of);
        }
        Ok(generated) => {
            info!(
                "Generated {} expense(s) from fixed expenses due by {}",
                generated.len(),
                as_of
            );
        }
        Err(e) => {
            warn!("Scheduled fixed expense generation failed: {}", e);
        }
    }
}
