//! Account registration.
//!
//! Registration is attempted opportunistically by front-end flows, so
//! invalid or duplicate attempts are declined with a [`Rejection`] and
//! leave the store untouched.

use serde::{Deserialize, Serialize};

use super::Store;
use crate::domain::text::{is_blank, is_valid_phone};
use crate::domain::{Admin, Identity, Location, Role, User};
use crate::error::Rejection;

/// Profile data collected by the front end for a new worker or employer.
///
/// Coordinates come from the geolocation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Platform handle.
    pub identity: u64,
    /// First name.
    pub name: String,
    /// Last name.
    pub last_name: String,
    /// Mobile phone, `09[1-9]` followed by six digits.
    pub phone: String,
    /// Formatted address.
    pub address: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Store {
    /// Registers a worker.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if a field is blank, the phone or the
    /// coordinates are invalid, or the identity is already registered
    /// under any role. Nothing is stored in that case.
    pub fn add_worker(&mut self, profile: &UserProfile) -> Result<Identity, Rejection> {
        self.add_user(Role::Worker, profile)
    }

    /// Registers an employer. Same rules as [`Store::add_worker`].
    ///
    /// # Errors
    ///
    /// See [`Store::add_worker`].
    pub fn add_employer(&mut self, profile: &UserProfile) -> Result<Identity, Rejection> {
        self.add_user(Role::Employer, profile)
    }

    /// Registers an admin.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::InvalidIdentity`] for `0` and
    /// [`Rejection::IdentityTaken`] if the identity is already registered
    /// under any role.
    pub fn add_admin(&mut self, identity: u64) -> Result<Identity, Rejection> {
        let result = Identity::new(identity)
            .map_err(|_| Rejection::InvalidIdentity)
            .and_then(|id| {
                if self.is_registered(id) {
                    Err(Rejection::IdentityTaken(id))
                } else {
                    Ok(id)
                }
            });
        match result {
            Ok(id) => {
                self.admins.insert(id, Admin::new(id));
                tracing::info!(identity = %id, "admin registered");
                Ok(id)
            }
            Err(reason) => {
                tracing::debug!(identity, %reason, "admin registration rejected");
                Err(reason)
            }
        }
    }

    fn add_user(&mut self, role: Role, profile: &UserProfile) -> Result<Identity, Rejection> {
        let user = self.admit_user(role, profile).inspect_err(|reason| {
            tracing::debug!(identity = profile.identity, %role, %reason, "registration rejected");
        })?;
        let id = user.identity();
        match role {
            Role::Worker => self.workers.insert(id, user),
            Role::Employer => self.employers.insert(id, user),
        };
        tracing::info!(identity = %id, %role, "user registered");
        Ok(id)
    }

    fn admit_user(&self, role: Role, profile: &UserProfile) -> Result<User, Rejection> {
        for (field, value) in [
            ("name", &profile.name),
            ("last_name", &profile.last_name),
            ("phone", &profile.phone),
            ("address", &profile.address),
        ] {
            if is_blank(value) {
                return Err(Rejection::BlankField(field));
            }
        }
        if !is_valid_phone(&profile.phone) {
            return Err(Rejection::InvalidPhone);
        }
        let id = Identity::new(profile.identity).map_err(|_| Rejection::InvalidIdentity)?;
        if self.is_registered(id) {
            return Err(Rejection::IdentityTaken(id));
        }
        let location = Location::new(&profile.address, profile.latitude, profile.longitude)
            .map_err(|_| Rejection::InvalidCoordinates)?;
        User::new(
            id,
            role,
            &profile.name,
            &profile.last_name,
            &profile.phone,
            location,
        )
        .map_err(|violation| Rejection::Invalid(violation.to_string()))
    }
}
