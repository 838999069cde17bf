//! Default registry contents, shared by the seeder binary, the in-process
//! fallback store and tests.

use crate::models::{department, subject};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set, sea_query::OnConflict};

pub const DEFAULT_DEPARTMENTS: &[&str] =
    &["Computer Science", "Commerce", "Management", "Science", "Arts"];

pub const DEFAULT_SUBJECTS: &[(&str, &str)] = &[
    ("CS801", "Distributed Systems"),
    ("CS802", "Cloud Computing"),
    ("CS803", "Mobile Application Development"),
    ("MGMT101", "Principles of Management"),
];

pub fn default_departments() -> Vec<department::Model> {
    DEFAULT_DEPARTMENTS
        .iter()
        .map(|name| department::Model {
            name: (*name).to_string(),
        })
        .collect()
}

pub fn default_subjects() -> Vec<subject::Model> {
    DEFAULT_SUBJECTS
        .iter()
        .map(|(id, name)| subject::Model {
            id: (*id).to_string(),
            name: (*name).to_string(),
        })
        .collect()
}

/// Inserts the default departments and subjects, skipping rows that exist.
pub async fn seed_registry<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let departments = default_departments()
        .into_iter()
        .map(|d| department::ActiveModel { name: Set(d.name) });
    department::Entity::insert_many(departments)
        .on_conflict(
            OnConflict::column(department::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec(db)
        .await?;

    let subjects = default_subjects().into_iter().map(|s| subject::ActiveModel {
        id: Set(s.id),
        name: Set(s.name),
    });
    subject::Entity::insert_many(subjects)
        .on_conflict(OnConflict::column(subject::Column::Id).do_nothing().to_owned())
        .do_nothing()
        .exec(db)
        .await?;

    tracing::debug!("Registry seeded");
    Ok(())
}
