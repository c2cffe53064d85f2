//! Spoken price report composition

use crate::date::format_marathi_date;
use intent_parser::Commodity;
use price_catalog::PriceRecord;
use std::fmt::Write;
use time::Date;

const GREETING: &str = "नमस्कार. ";

/// Commodity-specific opening of the price list.
pub fn lead_in(commodity: Commodity) -> &'static str {
    match commodity {
        Commodity::Onion => "आजचे कांद्याचे बाजार भाव (प्रति क्विंटल) असे आहेत: ",
        Commodity::Pea => "आजचे वाटाण्याचे बाजार भाव (प्रति क्विंटल) असे आहेत: ",
    }
}

fn no_data(commodity: Commodity) -> &'static str {
    match commodity {
        Commodity::Onion => "आजचे कांद्याचे बाजार भाव उपलब्ध नाहीत. ",
        Commodity::Pea => "आजचे वाटाण्याचे बाजार भाव उपलब्ध नाहीत. ",
    }
}

/// Build the sentence read out for a commodity.
///
/// Records are read in the order given. An empty list yields an explicit
/// "no prices today" sentence in place of the lead-in.
pub fn compose(commodity: Commodity, date: Date, records: &[PriceRecord]) -> String {
    let mut text = String::from(GREETING);
    let _ = write!(text, "आज {} आहे. ", format_marathi_date(date));

    if records.is_empty() {
        text.push_str(no_data(commodity));
        return text;
    }

    text.push_str(lead_in(commodity));
    for r in records {
        let _ = write!(
            text,
            "{}, कमीत कमी {} रुपये, जास्तीत जास्त {} रुपये. ",
            r.location, r.min_price, r.max_price
        );
    }
    text
}
