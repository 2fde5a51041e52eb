//! Request formatting for ERDDAP tabledap servers.
//!
//! Only the request url is built here, sending it is left to the caller.

use crate::{
    config::Dataset,
    error::{ArgoError, Result},
    fetcher::{AccessPoint, Region},
};
use itertools::Itertools;
use url::Url;

const CORE_VARIABLES: &[&str] = &[
    "platform_number",
    "cycle_number",
    "direction",
    "data_mode",
    "time",
    "time_qc",
    "latitude",
    "longitude",
    "position_qc",
    "pres",
    "pres_qc",
    "temp",
    "temp_qc",
    "psal",
    "psal_qc",
];

const REF_VARIABLES: &[&str] = &[
    "platform_number",
    "cycle_number",
    "time",
    "latitude",
    "longitude",
    "pres",
    "temp",
    "psal",
];

/// Builds tabledap request urls for one server and dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ErddapQuery {
    server: String,
    dataset: Dataset,
    extension: &'static str,
}

impl ErddapQuery {
    /// Create a query builder for CSV responses.
    pub fn new(server: &str, dataset: Dataset) -> Self {
        ErddapQuery {
            server: server.trim_end_matches('/').to_owned(),
            dataset,
            extension: "csv",
        }
    }

    /// Builder method for the response file type, e.g. `nc` or `json`.
    #[inline]
    pub fn with_extension(mut self, extension: &'static str) -> Self {
        self.extension = extension;
        self
    }

    /// The ERDDAP dataset id.
    pub fn dataset_id(&self) -> &'static str {
        match self.dataset {
            Dataset::Phy => "ArgoFloats",
            Dataset::Bgc => "ArgoFloats-synthetic-BGC",
            Dataset::Ref => "ArgoFloats-ref",
        }
    }

    /// Variables requested from the server.
    pub fn variables(&self) -> &'static [&'static str] {
        match self.dataset {
            Dataset::Ref => REF_VARIABLES,
            Dataset::Phy | Dataset::Bgc => CORE_VARIABLES,
        }
    }

    /// The full request url for an access point.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::{AccessPoint, Dataset, ErddapQuery};
    ///
    /// let q = ErddapQuery::new("https://www.ifremer.fr/erddap/", Dataset::Phy);
    /// let url = q.url(&AccessPoint::Profile(6902746, vec![1, 12])).unwrap();
    ///
    /// assert!(url.starts_with("https://www.ifremer.fr/erddap/tabledap/ArgoFloats.csv?"));
    /// assert!(url.contains("cycle_number=~%221|12%22"));
    /// ```
    pub fn url(&self, ap: &AccessPoint) -> Result<String> {
        let base = format!(
            "{}/tabledap/{}.{}",
            self.server,
            self.dataset_id(),
            self.extension
        );
        let mut url = Url::parse(&base).map_err(|err| ArgoError::InvalidOption {
            option: "erddap_server",
            value: format!("{} ({})", self.server, err),
        })?;

        let query = format!(
            "{}{}&distinct()&orderBy(\"time,pres\")",
            self.variables().join(","),
            constraints(ap)
        );
        url.set_query(Some(&query));

        Ok(url.to_string())
    }
}

fn constraints(ap: &AccessPoint) -> String {
    match ap {
        AccessPoint::Float(wmos) => format!("&platform_number=~\"{}\"", wmos.iter().join("|")),
        AccessPoint::Profile(wmo, cycles) => format!(
            "&platform_number=~\"{}\"&cycle_number=~\"{}\"",
            wmo,
            cycles.iter().join("|")
        ),
        AccessPoint::Region(region) => region_constraints(region),
    }
}

fn region_constraints(region: &Region) -> String {
    let mut out = String::new();

    for (name, (min, max)) in &[
        ("longitude", region.lon_bounds()),
        ("latitude", region.lat_bounds()),
        ("pres", region.pres_bounds()),
    ] {
        out.push_str(&format!("&{}>={}&{}<={}", name, min, name, max));
    }

    if let Some((start, end)) = region.time_bounds() {
        let fmt = "%Y-%m-%dT%H:%M:%SZ";
        out.push_str(&format!(
            "&time>={}&time<={}",
            start.format(fmt),
            end.format(fmt)
        ));
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_float_url() {
        let q = ErddapQuery::new("https://erddap.example.org/erddap", Dataset::Phy);
        let url = q
            .url(&AccessPoint::Float(vec![6902746, 6902747]))
            .unwrap();

        assert!(url.contains("/tabledap/ArgoFloats.csv?platform_number,cycle_number,"));
        assert!(url.contains("platform_number=~%226902746|6902747%22"));
        assert!(url.ends_with("&distinct()&orderBy(%22time,pres%22)"));
    }

    #[test]
    fn test_region_url() {
        let region = Region::from_box(
            [-85.0, -45.0, 10.0, 20.0, 0.0, 1000.0],
            Some(("2012-01", "2014-12")),
        )
        .unwrap();
        let q = ErddapQuery::new("https://erddap.example.org/erddap", Dataset::Phy);
        let url = q.url(&AccessPoint::Region(region)).unwrap();

        assert!(url.contains("&longitude%3E=-85&longitude%3C=-45"));
        assert!(url.contains("&pres%3E=0&pres%3C=1000"));
        assert!(url.contains("&time%3E=2012-01-01T00:00:00Z&time%3C=2014-12-01T00:00:00Z"));
    }

    #[test]
    fn test_dataset_ids_and_variables() {
        let q = ErddapQuery::new("https://erddap.example.org/erddap", Dataset::Ref)
            .with_extension("nc");
        assert_eq!(q.dataset_id(), "ArgoFloats-ref");
        assert!(!q.variables().contains(&"temp_qc"));

        let url = q.url(&AccessPoint::Float(vec![1])).unwrap();
        assert!(url.contains("ArgoFloats-ref.nc?"));

        let bgc = ErddapQuery::new("https://erddap.example.org/erddap", Dataset::Bgc);
        assert_eq!(bgc.dataset_id(), "ArgoFloats-synthetic-BGC");
    }
}
