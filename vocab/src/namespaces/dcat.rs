//! `dcat:` record schemas: catalogs, datasets, distributions and data services.
//!
//! Tables follow the DCAT 3 class descriptions. Only `title` and
//! `description` are mandatory here; repository-specific requirements are
//! layered on top by [`super::fdp`].

use crate::model::iris::*;
use crate::model::{FieldDescriptor, RecordSchema};

/// Schema name of `dcat:Catalog`.
pub const CATALOG: &str = "Catalog";
/// Schema name of `dcat:Dataset`.
pub const DATASET: &str = "Dataset";
/// Schema name of `dcat:Distribution`.
pub const DISTRIBUTION: &str = "Distribution";
/// Schema name of `dcat:DataService`.
pub const DATA_SERVICE: &str = "DataService";

const TITLE: FieldDescriptor =
    FieldDescriptor::literal("title", "http://purl.org/dc/terms/title").multiple();
const DESCRIPTION: FieldDescriptor =
    FieldDescriptor::literal("description", "http://purl.org/dc/terms/description").multiple();
const PUBLISHER: FieldDescriptor =
    FieldDescriptor::nested("publisher", "http://purl.org/dc/terms/publisher", super::foaf::AGENT);
const CONTACT_POINT: FieldDescriptor =
    FieldDescriptor::nested("contact_point", "http://www.w3.org/ns/dcat#contactPoint", super::vcard::KIND)
        .multiple();
const ISSUED: FieldDescriptor =
    FieldDescriptor::literal("issued", "http://purl.org/dc/terms/issued").datatype(XSD_DATETIME);
const MODIFIED: FieldDescriptor =
    FieldDescriptor::literal("modified", "http://purl.org/dc/terms/modified").datatype(XSD_DATETIME);
const LICENSE: FieldDescriptor = FieldDescriptor::iri("license", "http://purl.org/dc/terms/license");
const LANGUAGE: FieldDescriptor =
    FieldDescriptor::iri("language", "http://purl.org/dc/terms/language").multiple();

/// Returns the `dcat:Catalog` schema.
#[must_use]
pub fn catalog() -> RecordSchema {
    RecordSchema::new(
        CATALOG,
        "http://www.w3.org/ns/dcat#Catalog",
        vec![
            TITLE.mandatory(),
            DESCRIPTION.mandatory(),
            PUBLISHER,
            CONTACT_POINT,
            FieldDescriptor::iri("homepage", "http://xmlns.com/foaf/0.1/homepage"),
            LANGUAGE,
            LICENSE,
            FieldDescriptor::iri("rights", "http://purl.org/dc/terms/rights"),
            ISSUED,
            MODIFIED,
            FieldDescriptor::iri("theme_taxonomy", "http://www.w3.org/ns/dcat#themeTaxonomy").multiple(),
            FieldDescriptor::iri("dataset", "http://www.w3.org/ns/dcat#dataset").multiple(),
            FieldDescriptor::iri("service", "http://www.w3.org/ns/dcat#service").multiple(),
        ],
    )
    .with_resource_type("catalog")
}

/// Returns the `dcat:Dataset` schema.
#[must_use]
pub fn dataset() -> RecordSchema {
    RecordSchema::new(
        DATASET,
        "http://www.w3.org/ns/dcat#Dataset",
        vec![
            TITLE.mandatory(),
            DESCRIPTION.mandatory(),
            FieldDescriptor::literal("identifier", "http://purl.org/dc/terms/identifier"),
            PUBLISHER,
            CONTACT_POINT,
            FieldDescriptor::literal("keyword", "http://www.w3.org/ns/dcat#keyword").multiple(),
            FieldDescriptor::iri("theme", "http://www.w3.org/ns/dcat#theme").multiple(),
            FieldDescriptor::iri("landing_page", "http://www.w3.org/ns/dcat#landingPage"),
            FieldDescriptor::iri("distribution", "http://www.w3.org/ns/dcat#distribution").multiple(),
            FieldDescriptor::literal("version", "http://www.w3.org/ns/dcat#version"),
            LANGUAGE,
            ISSUED,
            MODIFIED,
        ],
    )
    .with_resource_type("dataset")
}

/// Returns the `dcat:Distribution` schema.
#[must_use]
pub fn distribution() -> RecordSchema {
    RecordSchema::new(
        DISTRIBUTION,
        "http://www.w3.org/ns/dcat#Distribution",
        vec![
            TITLE.mandatory(),
            DESCRIPTION,
            FieldDescriptor::iri("access_url", "http://www.w3.org/ns/dcat#accessURL").multiple(),
            FieldDescriptor::iri("download_url", "http://www.w3.org/ns/dcat#downloadURL").multiple(),
            FieldDescriptor::iri("media_type", "http://www.w3.org/ns/dcat#mediaType"),
            FieldDescriptor::iri("format", "http://purl.org/dc/terms/format"),
            FieldDescriptor::literal("byte_size", "http://www.w3.org/ns/dcat#byteSize")
                .datatype(XSD_NON_NEGATIVE_INTEGER),
            LICENSE,
            ISSUED,
            MODIFIED,
        ],
    )
    .with_resource_type("distribution")
}

/// Returns the `dcat:DataService` schema.
#[must_use]
pub fn data_service() -> RecordSchema {
    RecordSchema::new(
        DATA_SERVICE,
        "http://www.w3.org/ns/dcat#DataService",
        vec![
            TITLE.mandatory(),
            DESCRIPTION,
            FieldDescriptor::iri("endpoint_url", "http://www.w3.org/ns/dcat#endpointURL")
                .multiple()
                .mandatory(),
            FieldDescriptor::iri("endpoint_description", "http://www.w3.org/ns/dcat#endpointDescription"),
            FieldDescriptor::iri("serves_dataset", "http://www.w3.org/ns/dcat#servesDataset").multiple(),
            PUBLISHER,
            CONTACT_POINT,
            LICENSE,
        ],
    )
}
