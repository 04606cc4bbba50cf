use crate::error::AppError;
use crate::models::MonetaryDisplay;

const UNITS: [&str; 10] = [
    "", "один", "два", "три", "четыре", "пять", "шесть", "семь", "восемь", "девять",
];

// Thousands agree in gender: "одна тысяча", "две тысячи".
const UNITS_FEMININE: [&str; 10] = [
    "",
    "одна",
    "две",
    "три",
    "четыре",
    "пять",
    "шесть",
    "семь",
    "восемь",
    "девять",
];

const TEENS: [&str; 10] = [
    "десять",
    "одиннадцать",
    "двенадцать",
    "тринадцать",
    "четырнадцать",
    "пятнадцать",
    "шестнадцать",
    "семнадцать",
    "восемнадцать",
    "девятнадцать",
];

const TENS: [&str; 10] = [
    "",
    "",
    "двадцать",
    "тридцать",
    "сорок",
    "пятьдесят",
    "шестьдесят",
    "семьдесят",
    "восемьдесят",
    "девяносто",
];

const HUNDREDS: [&str; 10] = [
    "",
    "сто",
    "двести",
    "триста",
    "четыреста",
    "пятьсот",
    "шестьсот",
    "семьсот",
    "восемьсот",
    "девятьсот",
];

/// Picks the Russian plural form for a cardinal count.
fn plural_form<'a>(n: i64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let tail = n % 100;
    if (11..=14).contains(&tail) {
        return many;
    }
    match n % 10 {
        1 => one,
        2..=4 => few,
        _ => many,
    }
}

fn push_triple(n: i64, feminine: bool, out: &mut Vec<&'static str>) {
    debug_assert!((0..1000).contains(&n));
    let hundreds = (n / 100) as usize;
    let tail = n % 100;

    if hundreds > 0 {
        out.push(HUNDREDS[hundreds]);
    }
    if (10..20).contains(&tail) {
        out.push(TEENS[(tail - 10) as usize]);
        return;
    }
    let tens = (tail / 10) as usize;
    let units = (tail % 10) as usize;
    if tens > 0 {
        out.push(TENS[tens]);
    }
    if units > 0 {
        let table = if feminine { UNITS_FEMININE } else { UNITS };
        out.push(table[units]);
    }
}

/// Spells a non-negative rouble amount as lower-case Russian cardinal
/// words, nominative case, with no currency word ("тридцать один", not
/// "тридцать один рубль") — the surrounding certificate text supplies
/// the currency.
pub fn rubles_to_words(rubles: i64) -> Result<String, AppError> {
    if rubles < 0 {
        return Err(AppError::Format(format!(
            "cannot spell out negative amount {rubles}"
        )));
    }
    if rubles == 0 {
        return Ok("ноль".to_string());
    }
    if rubles >= 1_000_000_000_000 {
        return Err(AppError::Format(format!(
            "amount {rubles} is too large to spell out"
        )));
    }

    let mut parts: Vec<&'static str> = Vec::new();

    let billions = rubles / 1_000_000_000;
    let millions = rubles / 1_000_000 % 1000;
    let thousands = rubles / 1000 % 1000;
    let rest = rubles % 1000;

    if billions > 0 {
        push_triple(billions, false, &mut parts);
        parts.push(plural_form(billions, "миллиард", "миллиарда", "миллиардов"));
    }
    if millions > 0 {
        push_triple(millions, false, &mut parts);
        parts.push(plural_form(millions, "миллион", "миллиона", "миллионов"));
    }
    if thousands > 0 {
        push_triple(thousands, true, &mut parts);
        parts.push(plural_form(thousands, "тысяча", "тысячи", "тысяч"));
    }
    if rest > 0 {
        push_triple(rest, false, &mut parts);
    }

    Ok(parts.join(" "))
}

/// Splits a total into roubles, kopecks and spelled-out words.
///
/// Kopecks round half-up; when the fractional part rounds all the way to
/// 100 kopecks the rouble count is incremented and kopecks reset to 0,
/// so the displayed kopeck value stays in 0..=99.
pub fn monetary_display(amount: f64) -> Result<MonetaryDisplay, AppError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::Format(format!(
            "total earnings must be a non-negative finite number, got {amount}"
        )));
    }

    let mut rubles = amount.floor() as i64;
    // f64 stores values like 1234.995 just below the decimal half-kopeck;
    // nudge before rounding so decimal halves round up, not down.
    let mut kopecks = ((amount - amount.floor()) * 100.0 + 1e-9).round() as i64;
    if kopecks == 100 {
        rubles += 1;
        kopecks = 0;
    }

    Ok(MonetaryDisplay {
        rubles,
        kopecks: kopecks as u8,
        words: rubles_to_words(rubles)?,
    })
}

/// `"1235 (одна тысяча двести тридцать пять) руб. 0 коп."`
pub fn format_total(display: &MonetaryDisplay, zero_pad_kopecks: bool) -> String {
    if zero_pad_kopecks {
        format!(
            "{} ({}) руб. {:02} коп.",
            display.rubles, display.words, display.kopecks
        )
    } else {
        format!(
            "{} ({}) руб. {} коп.",
            display.rubles, display.words, display.kopecks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spells_zero() {
        assert_eq!(rubles_to_words(0).unwrap(), "ноль");
    }

    #[test]
    fn spells_units_tens_and_teens() {
        assert_eq!(rubles_to_words(7).unwrap(), "семь");
        assert_eq!(rubles_to_words(31).unwrap(), "тридцать один");
        assert_eq!(rubles_to_words(12).unwrap(), "двенадцать");
        assert_eq!(rubles_to_words(40).unwrap(), "сорок");
    }

    #[test]
    fn spells_hundreds() {
        assert_eq!(rubles_to_words(100).unwrap(), "сто");
        assert_eq!(rubles_to_words(215).unwrap(), "двести пятнадцать");
        assert_eq!(
            rubles_to_words(999).unwrap(),
            "девятьсот девяносто девять"
        );
    }

    #[test]
    fn thousands_use_feminine_units() {
        assert_eq!(rubles_to_words(1000).unwrap(), "одна тысяча");
        assert_eq!(rubles_to_words(2000).unwrap(), "две тысячи");
        assert_eq!(rubles_to_words(5000).unwrap(), "пять тысяч");
        assert_eq!(
            rubles_to_words(21_000).unwrap(),
            "двадцать одна тысяча"
        );
        assert_eq!(rubles_to_words(12_000).unwrap(), "двенадцать тысяч");
    }

    #[test]
    fn spells_millions_with_plural_agreement() {
        assert_eq!(rubles_to_words(1_000_000).unwrap(), "один миллион");
        assert_eq!(rubles_to_words(3_000_000).unwrap(), "три миллиона");
        assert_eq!(
            rubles_to_words(11_000_000).unwrap(),
            "одиннадцать миллионов"
        );
    }

    #[test]
    fn rejects_negative_and_oversized_amounts() {
        assert!(rubles_to_words(-1).is_err());
        assert!(rubles_to_words(1_000_000_000_000).is_err());
    }

    #[test]
    fn display_splits_rubles_and_kopecks() {
        let d = monetary_display(31.0).unwrap();
        assert_eq!(d.rubles, 31);
        assert_eq!(d.kopecks, 0);
        assert_eq!(d.words, "тридцать один");
        assert_eq!(
            format_total(&d, false),
            "31 (тридцать один) руб. 0 коп."
        );
    }

    #[test]
    fn display_carries_hundred_kopecks_into_rubles() {
        let d = monetary_display(1234.995).unwrap();
        assert_eq!(d.rubles, 1235);
        assert_eq!(d.kopecks, 0);
        assert_eq!(
            format_total(&d, false),
            "1235 (одна тысяча двести тридцать пять) руб. 0 коп."
        );
    }

    #[test]
    fn display_kopecks_stay_below_one_hundred() {
        for cents in 0..400 {
            let amount = cents as f64 / 100.0 + 0.995;
            let d = monetary_display(amount).unwrap();
            assert!(d.kopecks <= 99, "amount {amount} produced {}", d.kopecks);
        }
    }

    #[test]
    fn display_formats_zero_amount() {
        let d = monetary_display(0.0).unwrap();
        assert_eq!(format_total(&d, false), "0 (ноль) руб. 0 коп.");
    }

    #[test]
    fn zero_padding_is_opt_in() {
        let d = monetary_display(12.05).unwrap();
        assert_eq!(d.kopecks, 5);
        assert_eq!(format_total(&d, false), "12 (двенадцать) руб. 5 коп.");
        assert_eq!(format_total(&d, true), "12 (двенадцать) руб. 05 коп.");
    }

    #[test]
    fn display_rejects_invalid_amounts() {
        assert!(monetary_display(-0.01).is_err());
        assert!(monetary_display(f64::NAN).is_err());
        assert!(monetary_display(f64::INFINITY).is_err());
    }
}
