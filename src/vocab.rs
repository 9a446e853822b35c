//! Vocabulary definitions used during graph resolution and projection
//!
//! Holds the IRIs the projector treats specially and the default tables
//! (namespaces, label predicates, do-not-follow predicates) that seed
//! [`crate::config::ProjectionConfig`].

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_DESCRIPTION: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Description";

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
pub const SKOS_EXACT_MATCH: &str = "http://www.w3.org/2004/02/skos/core#exactMatch";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
pub const FOAF_DEPICTION: &str = "http://xmlns.com/foaf/0.1/depiction";
pub const FOAF_PRIMARY_TOPIC: &str = "http://xmlns.com/foaf/0.1/primaryTopic";
pub const GN_NAME: &str = "http://www.geonames.org/ontology#name";
pub const DC_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
pub const DBPEDIA_NAME: &str = "http://dbpedia.org/ontology/name";
pub const CC_ATTRIBUTION_URL: &str = "http://creativecommons.org/ns#attributionURL";

pub const ORE_AGGREGATES: &str = "http://www.openarchives.org/ore/terms/aggregates";
pub const ORE_IS_AGGREGATED_BY: &str = "http://www.openarchives.org/ore/terms/isAggregatedBy";
pub const ORE_AGGREGATION: &str = "http://www.openarchives.org/ore/terms/Aggregation";

pub const EDM_WEB_RESOURCE: &str = "http://www.europeana.eu/schemas/edm/WebResource";
pub const EDM_HAS_VIEW: &str = "http://www.europeana.eu/schemas/edm/hasView";
pub const EDM_OBJECT: &str = "http://www.europeana.eu/schemas/edm/object";
pub const EDM_IS_SHOWN_AT: &str = "http://www.europeana.eu/schemas/edm/isShownAt";
pub const EDM_IS_SHOWN_BY: &str = "http://www.europeana.eu/schemas/edm/isShownBy";

pub const GEO_LAT: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#lat";
pub const GEO_LONG: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#long";

pub const NAVE_NS: &str = "http://schemas.delving.eu/nave/terms/";
pub const NAVE_GEO_HASH: &str = "http://schemas.delving.eu/nave/terms/geoHash";
pub const NAVE_RESOURCE_SORT_ORDER: &str = "http://schemas.delving.eu/nave/terms/resourceSortOrder";
pub const NAVE_ALLOW_LOD: &str = "http://schemas.delving.eu/nave/terms/allowLinkedOpenData";
pub const NAVE_CACHE_URL: &str = "http://schemas.delving.org/nave/terms/cacheUrl";
pub const NAVE_THUMBNAIL: &str = "http://schemas.delving.eu/nave/terms/thumbnail";
pub const NAVE_THUMB_SMALL: &str = "http://schemas.delving.eu/nave/terms/thumbSmall";
pub const NAVE_THUMB_LARGE: &str = "http://schemas.delving.eu/nave/terms/thumbLarge";

pub const NARTHEX_NS: &str = "http://schemas.delving.eu/narthex/terms/";
pub const NARTHEX_PROXY_RESOURCE: &str = "http://schemas.delving.eu/narthex/terms/ProxyResource";
pub const NARTHEX_PROXY_LITERAL_VALUE: &str =
    "http://schemas.delving.eu/narthex/terms/proxyLiteralValue";
pub const NARTHEX_DATASET: &str = "http://schemas.delving.eu/narthex/terms/Dataset";

/// Label predicates, tried in order; the first one with any value wins
pub const LABEL_PROPERTIES: &[&str] = &[
    SKOS_PREF_LABEL,
    RDFS_LABEL,
    SKOS_ALT_LABEL,
    FOAF_NAME,
    GN_NAME,
    DC_TITLE,
    NARTHEX_PROXY_LITERAL_VALUE,
    DBPEDIA_NAME,
];

/// Graph-wide caption fallback when the about resource carries no label
pub const CAPTION_FALLBACK_PROPERTIES: &[&str] = &[DC_TITLE, SKOS_PREF_LABEL, RDFS_LABEL, GN_NAME];

pub const THUMBNAIL_PROPERTIES: &[&str] = &[
    FOAF_DEPICTION,
    NAVE_THUMBNAIL,
    NAVE_THUMB_SMALL,
    NAVE_THUMB_LARGE,
    EDM_OBJECT,
    EDM_IS_SHOWN_BY,
];

/// Objects reached through these predicates are never expanded
pub const DO_NOT_FOLLOW: &[&str] = &[
    FOAF_PRIMARY_TOPIC,
    ORE_IS_AGGREGATED_BY,
    CC_ATTRIBUTION_URL,
    EDM_IS_SHOWN_AT,
];

/// Flat-document keys whose entry order is meaningful and must not be re-sorted
pub const ORDERED_SEARCH_LABELS: &[&str] = &[
    "nave_deepZoomUrl",
    "nave_thumbSmall",
    "nave_thumbLarge",
    "nave_thumbnail",
    "edm_hasView",
];

/// Administrative narthex properties kept out of the projected documents
pub const EXCLUDED_PROPERTIES: &[&str] = &[
    "http://schemas.delving.eu/narthex/terms/datasetMapToPrefix",
    "http://schemas.delving.eu/narthex/terms/datasetCharacter",
    "http://schemas.delving.eu/narthex/terms/datasetErrorTime",
    "http://schemas.delving.eu/narthex/terms/acceptanceOnly",
    "http://schemas.delving.eu/narthex/terms/synced",
    "http://schemas.delving.eu/narthex/terms/stateSourced",
    "http://schemas.delving.eu/narthex/terms/stateSaved",
    "http://schemas.delving.eu/narthex/terms/stateProcessed",
    "http://schemas.delving.eu/narthex/terms/stateProcessable",
    "http://schemas.delving.eu/narthex/terms/stateMappable",
    "http://schemas.delving.eu/narthex/terms/stateAnalyzed",
    "http://schemas.delving.eu/narthex/terms/publishOAIPMH",
    "http://schemas.delving.eu/narthex/terms/publishLOD",
    "http://schemas.delving.eu/narthex/terms/publishIndex",
    "http://schemas.delving.eu/narthex/terms/processedValid",
    "http://schemas.delving.eu/narthex/terms/processedInvalid",
    "http://schemas.delving.eu/narthex/terms/actorOwner",
];

/// Default namespace table as `(iri, prefix)` pairs, in registration order
pub const DEFAULT_NAMESPACES: &[(&str, &str)] = &[
    ("http://purl.org/abm/sen", "abm"),
    ("http://www.europeana.eu/schemas/ese/", "europeana"),
    ("http://purl.org/dc/elements/1.1/", "dc"),
    ("http://schemas.delving.eu/", "delving"),
    ("http://purl.org/dc/terms/", "dcterms"),
    ("http://www.tib.nl/schemas/tib/", "tib"),
    ("http://www.delving.eu/namespaces/custom", "custom"),
    ("http://www.musip.nl/", "musip"),
    ("http://www.itin.nl/namespace", "itin"),
    ("http://www.itin.nl/drupal", "drup"),
    ("http://www.ab-c.nl/", "abc"),
    ("http://delving.eu/namespaces/raw", "raw"),
    ("http://www.icn.nl/schemas/icn/", "icn"),
    ("http://schemas.delving.eu/aff/", "aff"),
    ("http://schemas.delving.eu/abm/", "abm"),
    ("http://www.w3.org/2004/02/skos/core#", "skos"),
    ("http://dbpedia.org/ontology/", "dbpedia-owl"),
    ("http://www.w3.org/2003/01/geo/wgs84_pos#", "wgs84_pos"),
    ("http://xmlns.com/foaf/0.1/", "foaf"),
    ("http://www.w3.org/2002/07/owl#", "owl"),
    ("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "rdf"),
    ("http://www.w3.org/2000/01/rdf-schema#", "rdfs"),
    ("http://www.europeana.eu/schemas/edm/", "edm"),
    ("http://www.openarchives.org/ore/terms/", "ore"),
    ("http://schemas.delving.eu/narthex/terms/", "narthex"),
    ("http://schemas.delving.eu/nave/terms/", "nave"),
    ("http://localhost:8000/resource/", "devmode"),
    ("http://schemas.delving.eu/resource/ns/tib/", "tib"),
    ("http://creativecommons.org/ns#", "cc"),
    ("http://www.geonames.org/ontology#", "gn"),
    ("http://rdvocab.info/ElementsGr2/", "rda"),
];
