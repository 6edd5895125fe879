//! Database models for permits.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use septic_core::permits::{Permit, PermitInput};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::permits)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PermitDB {
    pub id: String,
    pub permit_number: String,
    pub property_address: String,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub applicant_phone: Option<String>,
    pub system_type: Option<String>,
    pub lot: Option<String>,
    pub block: Option<String>,
    pub construction_permit_for: Option<String>,
    pub excavation_required: Option<bool>,
    pub drainfield_depth: Option<String>,
    pub gpd_capacity: Option<String>,
    pub pump: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub is_pbts: bool,
    pub notes: Option<String>,
    pub pdf_file: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Every editable permit column. `pdf_file` is only changed by attaching a PDF.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::permits)]
#[diesel(treat_none_as_null = true)]
pub struct PermitChangeset {
    pub permit_number: String,
    pub property_address: String,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub applicant_phone: Option<String>,
    pub system_type: Option<String>,
    pub lot: Option<String>,
    pub block: Option<String>,
    pub construction_permit_for: Option<String>,
    pub excavation_required: Option<bool>,
    pub drainfield_depth: Option<String>,
    pub gpd_capacity: Option<String>,
    pub pump: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub is_pbts: bool,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl PermitChangeset {
    pub fn from_input(input: PermitInput, updated_at: NaiveDateTime) -> Self {
        Self {
            permit_number: input.permit_number,
            property_address: input.property_address,
            applicant_name: input.applicant_name,
            applicant_email: input.applicant_email,
            applicant_phone: input.applicant_phone,
            system_type: input.system_type,
            lot: input.lot,
            block: input.block,
            construction_permit_for: input.construction_permit_for,
            excavation_required: input.excavation_required,
            drainfield_depth: input.drainfield_depth,
            gpd_capacity: input.gpd_capacity,
            pump: input.pump,
            expiration_date: input.expiration_date,
            is_pbts: input.is_pbts,
            notes: input.notes,
            updated_at,
        }
    }
}

impl PermitDB {
    pub fn from_input(id: String, input: PermitInput, now: NaiveDateTime) -> Self {
        let changes = PermitChangeset::from_input(input, now);
        Self {
            id,
            permit_number: changes.permit_number,
            property_address: changes.property_address,
            applicant_name: changes.applicant_name,
            applicant_email: changes.applicant_email,
            applicant_phone: changes.applicant_phone,
            system_type: changes.system_type,
            lot: changes.lot,
            block: changes.block,
            construction_permit_for: changes.construction_permit_for,
            excavation_required: changes.excavation_required,
            drainfield_depth: changes.drainfield_depth,
            gpd_capacity: changes.gpd_capacity,
            pump: changes.pump,
            expiration_date: changes.expiration_date,
            is_pbts: changes.is_pbts,
            notes: changes.notes,
            pdf_file: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<PermitDB> for Permit {
    fn from(db: PermitDB) -> Self {
        Self {
            id: db.id,
            permit_number: db.permit_number,
            property_address: db.property_address,
            applicant_name: db.applicant_name,
            applicant_email: db.applicant_email,
            applicant_phone: db.applicant_phone,
            system_type: db.system_type,
            lot: db.lot,
            block: db.block,
            construction_permit_for: db.construction_permit_for,
            excavation_required: db.excavation_required,
            drainfield_depth: db.drainfield_depth,
            gpd_capacity: db.gpd_capacity,
            pump: db.pump,
            expiration_date: db.expiration_date,
            is_pbts: db.is_pbts,
            notes: db.notes,
            pdf_file: db.pdf_file,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
