//! The return-code table and per-operation acceptable-code sets.
//!
//! Every response terminates in a signed return code. Negative values are
//! error or alternate-outcome codes; non-negative values are often reused
//! as payload (e.g. a max-MFN query returns the id as the "return code").

/// Codes a record read is allowed to report without failing.
///
/// All four mean "found but unusable" rather than "not found": prior
/// version absent, logically deleted, or locked for edit.
pub const READ_RECORD_CODES: [i32; 4] = [-201, -600, -602, -603];

/// Codes a term read is allowed to report without failing:
/// no such term, end of list, start of list.
pub const READ_TERM_CODES: [i32; 3] = [-202, -203, -204];

/// Returns the human-readable description of a server return code.
pub fn describe_error(code: i32) -> &'static str {
    match code {
        -100 => "Заданный MFN вне пределов БД",
        -101 => "Ошибочный размер полки",
        -102 => "Ошибочный номер полки",
        -140 => "MFN вне пределов БД",
        -141 => "Ошибка чтения",
        -200 => "Указанное поле отсутствует",
        -201 => "Предыдущая версия записи отсутствует",
        -202 => "Заданный термин не найден (термин не существует)",
        -203 => "Последний термин в списке",
        -204 => "Первый термин в списке",
        -300 | -301 => "База данных монопольно заблокирована",
        -400 => "Ошибка при открытии файлов MST или XRF (ошибка файла данных)",
        -401 => "Ошибка при открытии файлов IFP (ошибка файла индекса)",
        -402 => "Ошибка при записи",
        -403 => "Ошибка при актуализации",
        -600 | -603 => "Запись логически удалена",
        -601 | -605 => "Запись физически удалена",
        -602 => "Запись заблокирована на ввод",
        -607 => "Ошибка autoin.gbl",
        -608 => "Ошибка версии записи",
        -700 => "Ошибка создания резервной копии",
        -701 => "Ошибка восстановления из резервной копии",
        -702 => "Ошибка сортировки",
        -703 => "Ошибочный термин",
        -704 => "Ошибка создания словаря",
        -705 => "Ошибка загрузки словаря",
        -800 => "Ошибка в параметрах глобальной корректировки",
        -801 => "ERR_GBL_REP",
        -802 => "ERR_GBL_MET",
        -1111 => "Ошибка исполнения сервера (SERVER_EXECUTE_ERROR)",
        -2222 => "Ошибка в протоколе (WRONG_PROTOCOL)",
        -3333 => "Незарегистрированный клиент (ошибка входа на сервер)",
        -3334 => "Клиент не выполнил вход на сервер",
        -3335 => "Неправильный уникальный идентификатор клиента",
        -3336 => "Нет доступа к командам АРМ",
        -3337 => "Клиент уже зарегистрирован",
        -3338 => "Недопустимый клиент",
        -4444 => "Неверный пароль",
        -5555 => "Файл не существует",
        -6666 => "Сервер перегружен. Достигнуто максимальное число потоков обработки",
        -7777 => "Не удалось запустить/прервать поток администратора (ошибка процесса)",
        -8888 => "Общая ошибка",
        _ => "Неизвестная ошибка",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(describe_error(-600), "Запись логически удалена");
        assert_eq!(describe_error(-603), "Запись логически удалена");
        assert_eq!(describe_error(-4444), "Неверный пароль");
        assert_eq!(describe_error(-8888), "Общая ошибка");
    }

    #[test]
    fn test_unmapped_code_falls_back() {
        assert_eq!(describe_error(-9999), "Неизвестная ошибка");
        assert_eq!(describe_error(-1), "Неизвестная ошибка");
    }

    #[test]
    fn test_acceptable_sets() {
        assert!(READ_RECORD_CODES.contains(&-600));
        assert!(!READ_RECORD_CODES.contains(&-601));
        assert!(READ_TERM_CODES.contains(&-204));
        assert!(!READ_TERM_CODES.contains(&-600));
    }
}
