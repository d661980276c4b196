//! Whole-batch loading.

use crate::{CodecConfig, CodecResult, Decoder, Document, LoadSession};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Counts from a finished load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Documents decoded per type name.
    pub decoded: BTreeMap<&'static str, usize>,
}

impl LoadReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.decoded.values().sum()
    }

    #[must_use]
    pub fn count(&self, type_name: &str) -> usize {
        self.decoded.get(type_name).copied().unwrap_or(0)
    }

    fn record(&mut self, type_name: &'static str) {
        *self.decoded.entry(type_name).or_insert(0) += 1;
    }
}

/// Decodes a batch of documents in the order given, then checks that every
/// referenced tag was completed.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    decoder: Decoder,
}

impl Loader {
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        Self {
            decoder: Decoder::new(config),
        }
    }

    #[must_use]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Loads `(type name, document)` pairs into `session`.
    ///
    /// Stops at the first failing document. When every document decodes but
    /// some referenced tags never appeared, fails with all of them at once.
    pub fn load<'a, I>(&self, session: &mut LoadSession, documents: I) -> CodecResult<LoadReport>
    where
        I: IntoIterator<Item = (&'a str, Document)>,
    {
        let mut report = LoadReport::default();
        for (type_name, document) in documents {
            let (name, decode) = session.decoder_for(type_name)?;
            decode(&self.decoder, session, &document)?;
            report.record(name);
        }
        session.verify_complete()?;
        info!("Loaded {} documents", report.total());
        debug!("Load counts: {:?}", report.decoded);
        Ok(report)
    }

    /// Like [`Loader::load`], parsing each document from JSON text first.
    pub fn load_json<'a, I>(&self, session: &mut LoadSession, documents: I) -> CodecResult<LoadReport>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let parsed = documents
            .into_iter()
            .map(|(type_name, json)| Document::parse(json).map(|document| (type_name, document)))
            .collect::<CodecResult<Vec<_>>>()?;
        self.load(session, parsed)
    }
}
