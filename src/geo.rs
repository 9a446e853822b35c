//! Geo-point extraction
//!
//! Points come from `wgs84_pos:lat`/`wgs84_pos:long` pairs, falling back
//! to `nave:geoHash` values written as `"lat,lon"`.

use tracing::{error, warn};

use crate::graph::Graph;
use crate::term::Term;
use crate::vocab::{GEO_LAT, GEO_LONG, NAVE_GEO_HASH};

/// `[lat, lon]`
pub type GeoPoint = [f64; 2];

fn parse_all<'a>(values: impl Iterator<Item = &'a Term>) -> Result<Vec<f64>, String> {
    values
        .map(|term| {
            term.lexical()
                .trim()
                .parse::<f64>()
                .map_err(|_| term.lexical().to_string())
        })
        .collect()
}

/// All geo points of a graph
///
/// Latitudes and longitudes are paired in graph order. A coordinate that
/// is not a plain decimal number (e.g. `"51,27"`) aborts the extraction
/// with an empty result; it is logged, never raised. When the graph has no
/// coordinates, or `only_geohash` is set, geohash values are used instead.
pub fn geo_points(graph: &Graph, only_geohash: bool) -> Vec<GeoPoint> {
    let lats = parse_all(graph.objects(GEO_LAT));
    let longs = parse_all(graph.objects(GEO_LONG));
    let (lats, longs) = match (lats, longs) {
        (Ok(lats), Ok(longs)) => (lats, longs),
        (Err(value), _) | (_, Err(value)) => {
            error!(value = %value, "Unable to get geo points");
            return Vec::new();
        }
    };
    if (lats.is_empty() && longs.is_empty()) || only_geohash {
        return geohash_points(graph);
    }
    lats.into_iter().zip(longs).map(|(lat, lon)| [lat, lon]).collect()
}

fn geohash_points(graph: &Graph) -> Vec<GeoPoint> {
    graph
        .objects(NAVE_GEO_HASH)
        .filter_map(|term| {
            let point = term.lexical().split_once(',').and_then(|(lat, lon)| {
                let lat = lat.trim().parse::<f64>().ok()?;
                let lon = lon.trim().parse::<f64>().ok()?;
                Some([lat, lon])
            });
            if point.is_none() {
                warn!(geohash = term.lexical(), "Skipping malformed geohash");
            }
            point
        })
        .collect()
}

/// Points rendered as `"lat,lon"` for documents
pub fn point_strings(points: &[GeoPoint]) -> Vec<String> {
    points
        .iter()
        .map(|[lat, lon]| format!("{},{}", lat, lon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;
    use crate::namespace::NamespaceRegistry;
    use std::sync::Arc;

    fn graph_with(statements: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new(None, Arc::new(NamespaceRegistry::with_defaults()));
        for (predicate, value) in statements {
            graph.add(
                Triple::new(
                    Term::iri("http://example.org/place"),
                    *predicate,
                    Term::literal(*value),
                )
                .unwrap(),
            );
        }
        graph
    }

    #[test]
    fn test_lat_long_pair() {
        let graph = graph_with(&[(GEO_LAT, "51.2729816364"), (GEO_LONG, "3.447957107")]);
        assert_eq!(geo_points(&graph, false), vec![[51.2729816364, 3.447957107]]);
    }

    #[test]
    fn test_comma_decimals_yield_nothing() {
        let graph = graph_with(&[(GEO_LAT, "51,2729816364"), (GEO_LONG, "3,447957107")]);
        assert!(geo_points(&graph, false).is_empty());
    }

    #[test]
    fn test_geohash_fallback() {
        let graph = graph_with(&[
            (NAVE_GEO_HASH, "52.0907, 5.1214"),
            (NAVE_GEO_HASH, "not a point"),
        ]);
        assert_eq!(geo_points(&graph, false), vec![[52.0907, 5.1214]]);
    }

    #[test]
    fn test_only_geohash() {
        let graph = graph_with(&[
            (GEO_LAT, "51.5"),
            (GEO_LONG, "3.4"),
            (NAVE_GEO_HASH, "52.0,5.0"),
        ]);
        assert_eq!(geo_points(&graph, true), vec![[52.0, 5.0]]);
    }

    #[test]
    fn test_point_strings() {
        assert_eq!(point_strings(&[[51.5, 3.25]]), vec!["51.5,3.25"]);
    }
}
