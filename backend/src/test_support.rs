//! Shared helpers for unit tests inside the crate.
//!
//! Only compiled for tests.

pub mod clock {
    //! Deterministic clocks.

    use std::sync::{Arc, Mutex, MutexGuard};

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Fixed instant used by fixtures unless a test needs another one.
    pub fn fixture_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    /// Clock whose current time only moves when a test advances it.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn shared(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self::new(now))
        }

        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex poisoned"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }

    /// Shared clock pinned to [`fixture_timestamp`].
    pub fn fixture_clock() -> Arc<dyn Clock> {
        MutableClock::shared(fixture_timestamp())
    }
}

pub mod fixtures {
    //! Domain values for tests.

    use chrono::{DateTime, Utc};

    use crate::domain::{
        EmailAddress, Job, JobId, JobType, PasswordHash, PersonName, Role, User, UserId,
    };

    use super::clock::fixture_timestamp;

    pub fn user(email: &str, role: Role) -> User {
        User {
            id: UserId::random(),
            email: EmailAddress::new(email).expect("fixture email"),
            password_hash: PasswordHash::new("$argon2id$fixture"),
            role,
            first_name: PersonName::new("Alice", "firstName").expect("fixture name"),
            last_name: PersonName::new("Liddell", "lastName").expect("fixture name"),
            created_at: fixture_timestamp(),
        }
    }

    pub fn job(title: &str) -> Job {
        job_posted_at(title, fixture_timestamp())
    }

    pub fn job_posted_at(title: &str, posted_at: DateTime<Utc>) -> Job {
        Job {
            id: JobId::random(),
            title: title.to_owned(),
            description: format!("{title} description"),
            location: "Remote".to_owned(),
            job_type: JobType::FullTime,
            company: "Acme".to_owned(),
            posted_at,
        }
    }
}
