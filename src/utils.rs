//! Вспомогательные парсеры чисел и поиск элементов в HTML.

use crate::error::ExtractError;
use crate::types::Money;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;
use std::sync::LazyLock;

/// Нормализует последовательность символов, схлопывая группы пробельных.
fn normalize_chars<I: IntoIterator<Item = char>>(iter: I) -> String {
    let mut output = String::new();
    let mut prev_space = false;
    for ch in iter {
        let is_space = ch.is_whitespace();
        if is_space {
            if !prev_space {
                output.push(' ');
            }
        } else {
            output.push(ch);
        }
        prev_space = is_space;
    }
    output.trim().to_string()
}

/// Нормализует числовую строку: разделители тысяч, пробелы, nbsp.
fn normalize_number(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !matches!(*ch, ',' | ' ' | '\u{a0}' | '\u{202f}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Разбирает денежное значение, трактуя пустую ячейку как ноль.
pub fn parse_amount(value: &str, column: &'static str) -> Result<Money, ExtractError> {
    let normalized = normalize_number(value);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(&normalized).map_err(|_| ExtractError::Number {
        value: value.trim().to_string(),
        column,
    })
}

/// Собирает текст всех потомков элемента и нормализует пробелы.
pub fn collect_text(element: ElementRef) -> String {
    normalize_chars(element.text().flat_map(|s| s.chars()))
}

static DIV_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div[id]").expect("valid div selector"));

/// Ищет `div` с точным значением атрибута `id`.
///
/// Номера счетов содержат символы, недопустимые в CSS-селекторе, поэтому
/// сравниваем атрибут напрямую вместо селектора по id.
pub fn find_div_by_id<'a>(doc: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    doc.select(&DIV_SELECTOR)
        .find(|div| div.value().id() == Some(id))
}

/// Перечисляет `div`, чей `id` начинается и заканчивается указанными строками.
pub fn divs_with_id_affixes<'a>(
    doc: &'a Html,
    prefix: &'a str,
    suffix: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> {
    doc.select(&DIV_SELECTOR).filter(move |div| {
        div.value()
            .id()
            .is_some_and(|id| id.starts_with(prefix) && id.ends_with(suffix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn amount_strips_thousands_separators() {
        let value = parse_amount("1,234.56", "test").unwrap();
        assert_eq!(value, Decimal::new(123_456, 2));
    }

    #[test]
    fn amount_empty_is_zero() {
        assert_eq!(parse_amount("  ", "test").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn amount_rejects_garbage() {
        assert!(parse_amount("N/A", "test").is_err());
    }
}
