/// OpenAPI documentation generation.
pub mod documentation;
/// Game lifecycle: creation, moves, cancellation and history.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Outgoing mail backends.
pub mod mailer;
/// Leaderboard and user ranking orderings.
pub mod ranking;
/// Reminder emails for users with unfinished games.
pub mod reminder_service;
/// Cron loop driving the reminder job.
pub mod scheduler;
/// Score listings, leaderboard and rankings.
pub mod score_service;
/// Average attempts statistic and its cache.
pub mod stats_service;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
/// Background task queue and worker.
pub mod task_queue;
/// User registration.
pub mod user_service;
