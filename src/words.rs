use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::totals::round2;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const SCALES: [(u64, &str); 4] = [
    (1_000_000_000_000, "Trillion"),
    (1_000_000_000, "Billion"),
    (1_000_000, "Million"),
    (1_000, "Thousand"),
];

fn below_thousand(n: u64, out: &mut Vec<&'static str>) {
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        out.push(ONES[hundreds as usize]);
        out.push("Hundred");
    }
    if rest >= 20 {
        out.push(TENS[(rest / 10) as usize]);
        if rest % 10 > 0 {
            out.push(ONES[(rest % 10) as usize]);
        }
    } else if rest > 0 {
        out.push(ONES[rest as usize]);
    }
}

/// Spell out a whole number in English ("Three Hundred Seventy Eight").
pub fn number_in_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut out = Vec::new();
    let mut rest = n;
    for (scale, name) in SCALES {
        if rest >= scale {
            below_thousand(rest / scale, &mut out);
            out.push(name);
            rest %= scale;
        }
    }
    below_thousand(rest, &mut out);
    out.join(" ")
}

/// Caption for the grand-total row, e.g.
/// "UAE Dirhams Three Hundred Seventy Eight and Fils Fifty Three Only".
pub fn amount_in_words(amount: Decimal) -> String {
    let amount = round2(amount.abs());
    let dirhams = amount.trunc().to_u64().unwrap_or(u64::MAX);
    let fils = (amount.fract() * Decimal::ONE_HUNDRED).to_u64().unwrap_or(0);

    let mut caption = format!("UAE Dirhams {}", number_in_words(dirhams));
    if fils > 0 {
        caption.push_str(" and Fils ");
        caption.push_str(&number_in_words(fils));
    }
    caption.push_str(" Only");
    caption
}
