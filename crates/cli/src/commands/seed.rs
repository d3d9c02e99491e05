//! Seed the database with farmers from a YAML file.
//!
//! Every entry is validated before connecting; one bad entry aborts the whole
//! run and all problems are reported together. Entries whose tax id is
//! already registered are skipped.
//!
//! ```yaml
//! farmers:
//!   - taxId: 54129784S
//!     name: Juan
//!     lastName: Troya
//!     address: C/hola
//!     phone: "956123456"
//!     email: meritorio@meritocracia.es
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, warn};

use cooperativa_web::db::{self, FarmerRepository, FarmerStore, RepositoryError};
use cooperativa_web::models::{NewPerson, PersonInput};

use super::database_url;

/// Top-level layout of a farmer seed file.
#[derive(Debug, Deserialize)]
pub struct FarmerSeedFile {
    pub farmers: Vec<PersonInput>,
}

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub enrolled: usize,
    pub skipped: usize,
}

/// Validate every entry, collecting one message per problem.
///
/// # Errors
///
/// Returns the list of problems if any entry is invalid or a tax id repeats.
pub fn validate_entries(file: FarmerSeedFile) -> Result<Vec<NewPerson>, Vec<String>> {
    let mut persons = Vec::with_capacity(file.farmers.len());
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, input) in file.farmers.into_iter().enumerate() {
        let label = format!("entry {} ({})", index + 1, input.tax_id.trim());
        match NewPerson::try_from(input) {
            Ok(person) => {
                if seen.insert(person.tax_id.clone()) {
                    persons.push(person);
                } else {
                    errors.push(format!("{label}: duplicate tax id in file"));
                }
            }
            Err(err) => errors.push(format!("{label}: {err}")),
        }
    }

    if errors.is_empty() {
        Ok(persons)
    } else {
        Err(errors)
    }
}

/// Enroll the farmers listed in a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
/// * `dry_run` - If true, only validate the file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or a database operation fails.
pub async fn farmers(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading farmers from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let file: FarmerSeedFile = serde_yaml::from_str(&content)?;

    info!(entries = file.farmers.len(), "Parsed seed file");

    let persons = match validate_entries(file) {
        Ok(persons) => persons,
        Err(errors) => {
            error!("Seed file validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };

    info!("Seed file validated successfully");

    if dry_run {
        info!(farmers = persons.len(), "Dry run, nothing written");
        return Ok(());
    }

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    let repository = FarmerRepository::new(pool);

    let result = enroll_all(&repository, &persons).await?;

    info!("Seeding complete!");
    info!("  Farmers enrolled: {}", result.enrolled);
    info!("  Farmers skipped (already exist): {}", result.skipped);

    Ok(())
}

/// Enroll each person, skipping those whose tax id already exists.
async fn enroll_all<S: FarmerStore>(
    store: &S,
    persons: &[NewPerson],
) -> Result<SeedResult, RepositoryError> {
    let mut result = SeedResult::default();

    for person in persons {
        match store.enroll(person).await {
            Ok(profile) => {
                info!(
                    tax_id = %person.tax_id,
                    member_number = %profile.member_number,
                    "Enrolled farmer"
                );
                result.enrolled += 1;
            }
            Err(RepositoryError::Conflict(reason)) => {
                warn!(tax_id = %person.tax_id, %reason, "Skipping existing person");
                result.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(result)
}
