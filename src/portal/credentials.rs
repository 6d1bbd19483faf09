//! Portal credentials.
//!
//! Both halves of the credential pair are held as `SecretString`, which keeps
//! them out of `Debug` output and zeroes the buffer when dropped. This is
//! best-effort scrubbing: copies made by the browser process or the OS are
//! out of reach.

use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Credentials {
    email: SecretString,
    password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: SecretString::from(email.into()),
            password: SecretString::from(password.into()),
        }
    }

    pub fn email(&self) -> &str {
        self.email.expose_secret()
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
