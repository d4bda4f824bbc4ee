//! Token session over the keychain and the engine.
//!
//! This is everything a front end needs: accept serial/seed text, show
//! the stored credentials back, clear them, and read the current code with
//! its refresh countdown.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rsauth_core::{
    Clock, RefreshBoundary, Seed, Serial, SystemClock, TokenCode, TokenConfig, TokenEngine,
    TokenError,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::keychain::Keychain;
use crate::store::SecretStore;

/// Stored credentials rendered for display. The seed is masked in `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CredentialsDisplay {
    /// Decimal serial.
    pub serial: String,
    /// Colon-separated hex seed.
    pub seed: String,
}

impl fmt::Debug for CredentialsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsDisplay")
            .field("serial", &self.serial)
            .field("seed", &"***")
            .finish()
    }
}

/// The code in force at an instant and when it rolls over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentCode {
    /// Derived code.
    pub code: TokenCode,
    /// Next refresh instant and nominal interval.
    pub refresh: RefreshBoundary,
    /// Time left until `refresh.next`.
    pub remaining: Duration,
}

/// A single token's credentials and settings.
pub struct TokenSession<S> {
    keychain: Keychain<S>,
    config: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl<S: SecretStore> TokenSession<S> {
    /// Session on the system clock.
    pub fn new(keychain: Keychain<S>, config: TokenConfig) -> Self {
        Self::with_clock(keychain, config, Arc::new(SystemClock))
    }

    /// Session on a caller-supplied clock.
    pub fn with_clock(keychain: Keychain<S>, config: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            keychain,
            config,
            clock,
        }
    }

    /// The keychain backing this session.
    pub const fn keychain(&self) -> &Keychain<S> {
        &self.keychain
    }

    /// Decode and store a decimal serial.
    ///
    /// Invalid text leaves the stored serial untouched.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Format` if `text` is not a decimal number.
    pub fn enter_serial(&mut self, text: &str) -> Result<(), TokenError> {
        let serial = Serial::decode(text).inspect_err(|e| {
            tracing::debug!("serial entry rejected: {e}");
        })?;
        self.keychain.set_serial(Some(&serial));
        Ok(())
    }

    /// Decode and store a colon-separated hex seed.
    ///
    /// Invalid text leaves the stored seed untouched.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Format` if any segment is not a hex octet.
    pub fn enter_seed(&mut self, text: &str) -> Result<(), TokenError> {
        let seed = Seed::decode(text).inspect_err(|e| {
            tracing::debug!("seed entry rejected: {e}");
        })?;
        self.keychain.set_seed(Some(&seed));
        Ok(())
    }

    /// Forget both credentials.
    pub fn clear(&mut self) {
        self.keychain.clear();
        tracing::info!("token credentials cleared");
    }

    /// `true` once both serial and seed are stored.
    pub fn is_configured(&self) -> bool {
        self.keychain.serial().is_some() && self.keychain.seed().is_some()
    }

    /// Stored credentials as text, when both are present.
    pub fn display(&self) -> Option<CredentialsDisplay> {
        let serial = self.keychain.serial()?;
        let seed = self.keychain.seed()?;
        Some(CredentialsDisplay {
            serial: serial.encode(),
            seed: seed.encode(),
        })
    }

    /// Engine over the stored credentials, `None` until both are stored.
    pub fn engine(&self) -> Option<TokenEngine> {
        let serial = self.keychain.serial()?;
        let seed = self.keychain.seed()?;
        Some(TokenEngine::with_clock(
            serial.as_bytes(),
            seed.expose(),
            self.config,
            Arc::clone(&self.clock),
        ))
    }

    /// Code and refresh countdown at the clock's current instant.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InsufficientInput` if the stored serial or seed
    /// is too short for derivation.
    pub fn current(&self) -> Result<Option<CurrentCode>, TokenError> {
        self.current_at(self.clock.now())
    }

    /// Code and refresh countdown at `at`; `None` until configured.
    ///
    /// # Errors
    ///
    /// Same as [`Self::current`].
    pub fn current_at(&self, at: DateTime<Utc>) -> Result<Option<CurrentCode>, TokenError> {
        let Some(engine) = self.engine() else {
            return Ok(None);
        };
        let code = engine.code_at(at)?;
        let refresh = engine.refresh_boundary(at);
        Ok(Some(CurrentCode {
            code,
            remaining: refresh.remaining(at),
            refresh,
        }))
    }
}

impl<S> fmt::Debug for TokenSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
