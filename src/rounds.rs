//! The cost-driven part of bcrypt as a resumable computation.
//!
//! A [`RoundJob`] is seeded once with the expensive key schedule, then runs its `2^cost`
//! iterations in slices bounded by a wall-clock budget. Whoever drives it (a plain loop, an
//! async task, a thread) decides what happens between slices; the sequence of key schedule
//! operations is the same however the work is sliced.

use std::time::{Duration, Instant};

use zeroize::Zeroizing;

use crate::blowfish::{Blowfish, DIGEST_LEN};
use crate::error::{BcryptError, Result};
use crate::password::PasswordBytes;
use crate::salt::{RawSalt, MAX_COST, MIN_COST};

/// Wall-clock budget of one slice.
pub const SLICE_BUDGET: Duration = Duration::from_millis(100);

/// The 24 raw digest bytes; the hash text keeps the first 23.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

/// Result of one call to [`RoundJob::resume`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Iterations remain, or the digest has not been produced yet. Carries `done / total`.
    InProgress(f64),
    Done(Digest),
}

/// State of a single in-flight hash computation. Never shared between calls.
pub struct RoundJob {
    password: Zeroizing<Vec<u8>>,
    salt: RawSalt,
    total: u64,
    done: u64,
    state: Blowfish,
    digest: Option<Digest>,
}

impl RoundJob {
    /// Validates `cost` and runs the expensive key schedule seeding step.
    pub fn new(password: &PasswordBytes, salt: &RawSalt, cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(BcryptError::RoundsOutOfRange(cost));
        }

        let mut state = Blowfish::init_state();
        state.eks_expand_key(salt.as_bytes(), password.as_bytes());

        let total = 1u64 << cost;
        tracing::debug!(cost, iterations = total, "starting bcrypt key schedule");

        Ok(RoundJob {
            password: Zeroizing::new(password.as_bytes().to_vec()),
            salt: *salt,
            total,
            done: 0,
            state,
            digest: None,
        })
    }

    pub fn total_iterations(&self) -> u64 {
        self.total
    }

    pub fn iterations_done(&self) -> u64 {
        self.done
    }

    /// Fraction of iterations completed, in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        self.done as f64 / self.total as f64
    }

    fn iterate(&mut self) {
        self.state.expand_key(&self.password);
        self.state.expand_key(self.salt.as_bytes());
        self.done += 1;
    }

    /// Runs one slice.
    ///
    /// While iterations remain, at least one is run and more follow until the budget is
    /// spent; the slice then reports [`Step::InProgress`], even if it finished the last
    /// iteration. The call after that produces the digest.
    pub fn resume(&mut self, budget: Duration) -> Step {
        if let Some(digest) = self.digest {
            return Step::Done(digest);
        }

        if self.done < self.total {
            let start = Instant::now();
            while self.done < self.total {
                self.iterate();
                if start.elapsed() >= budget {
                    break;
                }
            }
            tracing::trace!(done = self.done, total = self.total, "bcrypt slice finished");
            return Step::InProgress(self.progress());
        }

        let digest = Digest(self.state.digest());
        self.digest = Some(digest);
        Step::Done(digest)
    }

    /// Runs every remaining iteration without interruption.
    pub fn run_to_completion(mut self) -> Digest {
        let start = Instant::now();
        while self.done < self.total {
            self.iterate();
        }
        let digest = Digest(self.state.digest());
        tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "bcrypt finished");
        digest
    }

    /// Runs slices of `budget`, reporting progress before each one, until the digest is ready.
    ///
    /// `progress` sees `0.0` first and `1.0` last.
    pub fn run_with_progress<F>(mut self, budget: Duration, mut progress: F) -> Digest
    where
        F: FnMut(f64),
    {
        let start = Instant::now();
        loop {
            progress(self.progress());
            if let Step::Done(digest) = self.resume(budget) {
                tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "bcrypt finished");
                return digest;
            }
        }
    }
}
