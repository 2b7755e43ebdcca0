//! FAIR Data Point overlays on the DCAT schemas.
//!
//! A FAIR Data Point rejects records that lack a publisher or an
//! `dcterms:isPartOf` anchor to their parent resource. These schemas are the
//! DCAT base tables with those requirements overlaid.

use crate::model::iris::DCTERMS_IS_PART_OF;
use crate::model::{FieldDescriptor, RecordSchema};

/// Schema name of the FDP catalog overlay.
pub const FDP_CATALOG: &str = "FdpCatalog";
/// Schema name of the FDP dataset overlay.
pub const FDP_DATASET: &str = "FdpDataset";
/// Schema name of the FDP distribution overlay.
pub const FDP_DISTRIBUTION: &str = "FdpDistribution";

/// Field name of the parent anchor shared by every FDP overlay.
pub const IS_PART_OF: &str = "is_part_of";

const PARENT: FieldDescriptor = FieldDescriptor::iri(IS_PART_OF, DCTERMS_IS_PART_OF).mandatory();
const PUBLISHER: FieldDescriptor = FieldDescriptor::nested(
    "publisher",
    "http://purl.org/dc/terms/publisher",
    super::foaf::AGENT,
)
.mandatory();

/// Returns the FDP catalog schema.
#[must_use]
pub fn catalog() -> RecordSchema {
    super::dcat::catalog().overlay(
        FDP_CATALOG,
        "http://www.w3.org/ns/dcat#Catalog",
        &[PUBLISHER, PARENT],
    )
}

/// Returns the FDP dataset schema.
#[must_use]
pub fn dataset() -> RecordSchema {
    super::dcat::dataset().overlay(
        FDP_DATASET,
        "http://www.w3.org/ns/dcat#Dataset",
        &[
            PUBLISHER,
            FieldDescriptor::iri("theme", "http://www.w3.org/ns/dcat#theme")
                .multiple()
                .mandatory(),
            PARENT,
        ],
    )
}

/// Returns the FDP distribution schema.
#[must_use]
pub fn distribution() -> RecordSchema {
    super::dcat::distribution().overlay(
        FDP_DISTRIBUTION,
        "http://www.w3.org/ns/dcat#Distribution",
        &[
            FieldDescriptor::iri("media_type", "http://www.w3.org/ns/dcat#mediaType").mandatory(),
            PARENT,
        ],
    )
}
