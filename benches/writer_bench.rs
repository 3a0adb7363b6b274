use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use profile_xml::*;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn options(profile: Profile, indent: bool) -> WriterOptions {
    let builder = WriterOptionsBuilder::new(profile).namespaces(NamespaceTable::cii());
    let builder = if indent { builder } else { builder.compact() };
    builder.build().unwrap()
}

/// A CII-shaped invoice with `lines` line items. Roughly a third of the
/// elements are declared for profiles other than the active one.
fn write_invoice(profile: Profile, lines: usize, indent: bool) -> String {
    let mut w = XmlBufferWriter::in_memory(options(profile, indent)).unwrap();
    let all = Profile::UNKNOWN;
    let basic_up = Profile::BASIC | Profile::COMFORT | Profile::EXTENDED | Profile::XRECHNUNG;
    let comfort_up = Profile::COMFORT | Profile::EXTENDED | Profile::XRECHNUNG;

    w.start_document().unwrap();
    w.start_element("rsm", "CrossIndustryInvoice", all).unwrap();

    w.start_element("rsm", "ExchangedDocument", all).unwrap();
    w.write_element_string("ram", "ID", "BENCH-001", all).unwrap();
    w.write_element_string("ram", "TypeCode", "380", all).unwrap();
    w.write_date_time_string("ram", "IssueDateTime", test_date(), all)
        .unwrap();
    w.start_element("ram", "IncludedNote", basic_up).unwrap();
    w.write_element_string("ram", "Content", "Benchmark note", basic_up)
        .unwrap();
    w.end_element().unwrap();
    w.end_element().unwrap();

    w.start_element("rsm", "SupplyChainTradeTransaction", all).unwrap();
    for i in 1..=lines {
        w.start_element("ram", "IncludedSupplyChainTradeLineItem", basic_up)
            .unwrap();
        w.start_element("ram", "AssociatedDocumentLineDocument", basic_up)
            .unwrap();
        w.write_element_string("ram", "LineID", &i.to_string(), basic_up)
            .unwrap();
        w.end_element().unwrap();
        w.start_element("ram", "SpecifiedTradeProduct", basic_up).unwrap();
        w.write_optional_element_string("ram", "GlobalID", None, comfort_up)
            .unwrap();
        w.write_element_string("ram", "Name", &format!("Item {i}"), basic_up)
            .unwrap();
        w.write_element_string("ram", "Description", "Line description", comfort_up)
            .unwrap();
        w.end_element().unwrap();
        w.start_element("ram", "SpecifiedLineTradeSettlement", basic_up)
            .unwrap();
        w.start_element("ram", "SpecifiedTradeSettlementLineMonetarySummation", basic_up)
            .unwrap();
        let total = dec!(9.99) * Decimal::from(i);
        w.write_optional_amount("ram", "LineTotalAmount", Some(total), 2, None, basic_up)
            .unwrap();
        w.end_element().unwrap();
        w.end_element().unwrap();
        w.end_element().unwrap();
    }
    w.start_element("ram", "ApplicableHeaderTradeSettlement", all).unwrap();
    w.write_element_string("ram", "InvoiceCurrencyCode", "EUR", all)
        .unwrap();
    w.write_optional_amount("ram", "TaxTotalAmount", Some(dec!(285)), 2, Some("EUR"), all)
        .unwrap();
    w.end_element().unwrap();
    w.end_element().unwrap();

    w.end_element().unwrap();
    w.end_document().unwrap();
    w.into_string().unwrap()
}

fn bench_write_10_lines(c: &mut Criterion) {
    c.bench_function("write_comfort_10_lines", |b| {
        b.iter(|| black_box(write_invoice(black_box(Profile::COMFORT), 10, true)));
    });
}

fn bench_write_1000_lines(c: &mut Criterion) {
    c.bench_function("write_comfort_1000_lines", |b| {
        b.iter(|| black_box(write_invoice(black_box(Profile::COMFORT), 1000, true)));
    });
    c.bench_function("write_comfort_1000_lines_compact", |b| {
        b.iter(|| black_box(write_invoice(black_box(Profile::COMFORT), 1000, false)));
    });
}

fn bench_write_filtered(c: &mut Criterion) {
    // MINIMUM drops every line item, so this measures pure suppression.
    c.bench_function("write_minimum_1000_lines", |b| {
        b.iter(|| black_box(write_invoice(black_box(Profile::MINIMUM), 1000, true)));
    });
}

fn bench_sanitize(c: &mut Criterion) {
    let clean = "Müller & Söhne GmbH, Hauptstraße 1, 10115 Berlin ".repeat(40);
    let dirty = "Müller\u{1}& Söhne\u{B} GmbH\u{FFFE} ".repeat(40);
    c.bench_function("sanitize_valid", |b| {
        b.iter(|| black_box(sanitize(black_box(&clean), false).is_ok()));
    });
    c.bench_function("sanitize_clean_dirty", |b| {
        b.iter(|| black_box(sanitize(black_box(&dirty), true).map(|s| s.len())));
    });
}

criterion_group!(
    benches,
    bench_write_10_lines,
    bench_write_1000_lines,
    bench_write_filtered,
    bench_sanitize,
);
criterion_main!(benches);
