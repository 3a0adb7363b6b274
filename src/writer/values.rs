use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::ProfileAwareWriter;
use super::sink::XmlSink;
use crate::core::{Profile, XmlResult};

/// Format a Decimal with exactly `decimals` places, rounding half away from
/// zero.
pub fn format_decimal(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    rounded.to_string()
}

/// UNTDID 2379 format 102: `YYYYMMDD`.
pub fn format_date_102(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

impl<S: XmlSink> ProfileAwareWriter<S> {
    /// `<name attr="value">text</name>`, all governed by `profile`.
    pub fn write_element_with_attribute(
        &mut self,
        prefix: &str,
        local_name: &str,
        attribute: &str,
        attribute_value: &str,
        text: &str,
        profile: Profile,
    ) -> XmlResult {
        self.start_element(prefix, local_name, profile)?;
        self.write_attribute_string("", attribute, attribute_value, Profile::UNKNOWN)?;
        self.write_value(text, Profile::UNKNOWN)?;
        self.end_element()
    }

    /// An amount with `decimals` places and an optional `currencyID`.
    /// `None` writes nothing.
    pub fn write_optional_amount(
        &mut self,
        prefix: &str,
        local_name: &str,
        value: Option<Decimal>,
        decimals: u32,
        currency: Option<&str>,
        profile: Profile,
    ) -> XmlResult {
        let Some(value) = value else {
            return Ok(());
        };
        self.start_element(prefix, local_name, profile)?;
        if let Some(currency) = currency {
            self.write_attribute_string("", "currencyID", currency, Profile::UNKNOWN)?;
        }
        self.write_value(&format_decimal(value, decimals), Profile::UNKNOWN)?;
        self.end_element()
    }

    /// `<prefix:local_name><udt:DateTimeString format="102">YYYYMMDD</udt:DateTimeString></prefix:local_name>`
    pub fn write_date_time_string(
        &mut self,
        prefix: &str,
        local_name: &str,
        date: NaiveDate,
        profile: Profile,
    ) -> XmlResult {
        self.start_element(prefix, local_name, profile)?;
        self.start_element("udt", "DateTimeString", Profile::UNKNOWN)?;
        self.write_attribute_string("", "format", "102", Profile::UNKNOWN)?;
        self.write_value(&format_date_102(date), Profile::UNKNOWN)?;
        self.end_element()?;
        self.end_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{WriterOptionsBuilder, XmlBufferWriter};
    use rust_decimal_macros::dec;

    fn writer(profile: Profile) -> XmlBufferWriter {
        let options = WriterOptionsBuilder::new(profile)
            .compact()
            .write_declaration(false)
            .build()
            .unwrap();
        XmlBufferWriter::in_memory(options).unwrap()
    }

    #[test]
    fn format_decimal_cases() {
        assert_eq!(format_decimal(dec!(100), 2), "100.00");
        assert_eq!(format_decimal(dec!(1500.0), 2), "1500.00");
        assert_eq!(format_decimal(dec!(49.905), 2), "49.91");
        assert_eq!(format_decimal(dec!(-0.125), 2), "-0.13");
        assert_eq!(format_decimal(dec!(19), 0), "19");
        assert_eq!(format_decimal(dec!(1.5), 4), "1.5000");
    }

    #[test]
    fn format_date_cases() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(format_date_102(d), "20240605");
    }

    #[test]
    fn amount_with_currency() {
        let mut w = writer(Profile::COMFORT);
        w.write_optional_amount("", "TaxTotalAmount", Some(dec!(285)), 2, Some("EUR"), Profile::UNKNOWN)
            .unwrap();
        w.write_optional_amount("", "Missing", None, 2, None, Profile::UNKNOWN)
            .unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            r#"<TaxTotalAmount currencyID="EUR">285.00</TaxTotalAmount>"#
        );
    }

    #[test]
    fn amount_excluded_by_profile() {
        let mut w = writer(Profile::MINIMUM);
        w.start_element("", "Sum", Profile::UNKNOWN).unwrap();
        w.write_optional_amount("", "LineTotalAmount", Some(dec!(1)), 2, None, Profile::COMFORT)
            .unwrap();
        w.end_element().unwrap();
        assert_eq!(w.into_string().unwrap(), "");
    }

    #[test]
    fn date_time_string() {
        let mut w = writer(Profile::COMFORT);
        let d = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        w.write_date_time_string("ram", "IssueDateTime", d, Profile::UNKNOWN)
            .unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            r#"<ram:IssueDateTime><udt:DateTimeString format="102">20240615</udt:DateTimeString></ram:IssueDateTime>"#
        );
    }

    #[test]
    fn element_with_attribute() {
        let mut w = writer(Profile::COMFORT);
        w.write_element_with_attribute("ram", "ID", "schemeID", "VA", "DE123456789", Profile::UNKNOWN)
            .unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            r#"<ram:ID schemeID="VA">DE123456789</ram:ID>"#
        );
    }
}
