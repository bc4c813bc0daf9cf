/// Колонки CSV файла в фиксированном порядке.
pub const CSV_COLUMNS: [&str; 4] = ["Time stamp", "TMR", "Power", "Temp"];

/// Имя выходного файла по умолчанию (в рабочем каталоге).
pub const DEFAULT_OUTPUT_FILE: &str = "data.csv";

/// Строка заголовка в том виде, в каком она лежит в файле.
pub fn header_line() -> String {
    CSV_COLUMNS.join(",")
}

/// Проверяет, что заголовок файла совпадает с [`CSV_COLUMNS`].
pub fn is_valid_header<'a, I>(fields: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    fields.into_iter().eq(CSV_COLUMNS.iter().copied())
}
