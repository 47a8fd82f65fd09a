use otspec::types::*;
use otspec::{
    table, DeserializationError, Deserializer, ReaderContext, SerializationError, Serializer, Tag,
};

/// The 'hmtx' OpenType tag.
pub const TAG: Tag = Tag::new(b"hmtx");

table!(
    /// A single horizontal metric
    Metric {
        uint16 advanceWidth
        int16 lsb
    }
);

/// The horizontal metrics table
#[derive(Clone, Debug, PartialEq)]
#[allow(non_camel_case_types)]
pub struct hmtx {
    /// The list of metrics, corresponding to the glyph order
    pub metrics: Vec<Metric>,
}

impl hmtx {
    /// The number of full metric records needed: trailing glyphs sharing the
    /// last advance width only store their left side bearing.
    pub fn number_of_hmetrics(&self) -> uint16 {
        let last = match self.metrics.last() {
            Some(metric) => metric.advanceWidth,
            None => return 0,
        };
        let dupe_widths = self
            .metrics
            .iter()
            .rev()
            .skip(1)
            .take_while(|m| m.advanceWidth == last)
            .count();
        // metrics come from a glyph order, which never exceeds 65535 entries
        (self.metrics.len() - dupe_widths) as uint16
    }

    /// Serialize the table, returning the bytes and the `numberOfHMetrics`
    /// value to store in `hhea`. Without compression every glyph gets a full
    /// record.
    pub fn to_bytes(&self, compress: bool) -> Result<(Vec<u8>, uint16), SerializationError> {
        let n = if compress {
            self.number_of_hmetrics()
        } else {
            self.metrics.len() as uint16
        };
        let mut bytes: Vec<u8> = vec![];
        for (i, metric) in self.metrics.iter().enumerate() {
            if i < usize::from(n) {
                bytes.put(metric)?;
            } else {
                bytes.put(metric.lsb)?;
            }
        }
        Ok((bytes, n))
    }
}

/// Deserializes a Horizontal Metrics Table given a binary vector and the
/// `numberOfHMetrics` field of the `hhea` table.
pub fn from_bytes(
    c: &mut ReaderContext,
    number_of_h_metrics: uint16,
) -> Result<hmtx, DeserializationError> {
    let mut metrics: Vec<Metric> = c.de_counted(number_of_h_metrics.into())?;
    let other_lsbs: Vec<int16> = c.de()?;
    if !other_lsbs.is_empty() {
        let last = metrics
            .last()
            .ok_or_else(|| DeserializationError("hmtx has no advance widths".to_string()))?
            .advanceWidth;
        metrics.extend(other_lsbs.into_iter().map(|lsb| Metric {
            advanceWidth: last,
            lsb,
        }));
    }
    Ok(hmtx { metrics })
}
