use std::path::PathBuf;

use chatdb_core::{DbType, Msg, SelectedFile};

pub const HELP: &str = "\
Type a message and press Enter to send it.
  /file <path>                  select the file to upload
  /clear-file                   clear the file selection
  /upload                       upload the selected file
  /explore <mysql|mongodb>      list tables or collections
  /sql <question>               translate a question into SQL
  /execute [mongodb] <query>    run a query (MySQL unless mongodb is given)
  /help                         show this help
  /quit                         exit";

/// One line typed at the prompt, mapped onto page interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    SelectFile(PathBuf),
    ClearFile,
    Upload,
    Explore(DbType),
    Translate(String),
    Execute { query: String, db_type: DbType },
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Command::Send(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim_end(), ""),
        };
        match name {
            "file" if !arg.is_empty() => Command::SelectFile(PathBuf::from(arg)),
            "clear-file" => Command::ClearFile,
            "upload" => Command::Upload,
            "explore" => match DbType::parse(arg) {
                Some(db_type) => Command::Explore(db_type),
                None => Command::Help,
            },
            "sql" => Command::Translate(arg.to_string()),
            "execute" => parse_execute(arg),
            "quit" | "exit" => Command::Quit,
            _ => Command::Help,
        }
    }

    /// The messages a browser would dispatch for the same interaction.
    pub fn into_msgs(self) -> Vec<Msg> {
        match self {
            Command::Send(text) => vec![Msg::InputChanged(text), Msg::SendClicked],
            Command::SelectFile(path) => {
                vec![Msg::FilesSelected(vec![SelectedFile::from_path(path)])]
            }
            Command::ClearFile => vec![Msg::FilesSelected(Vec::new())],
            Command::Upload => vec![Msg::UploadClicked],
            Command::Explore(db_type) => vec![Msg::ExploreRequested(db_type)],
            Command::Translate(query) => vec![Msg::TranslateRequested(query)],
            Command::Execute { query, db_type } => vec![Msg::ExecuteRequested { query, db_type }],
            Command::Help | Command::Quit => Vec::new(),
        }
    }
}

/// `/execute [mysql|mongodb] <query>`; without a database name the whole
/// argument is a MySQL query.
fn parse_execute(arg: &str) -> Command {
    if let Some((first, rest)) = arg.split_once(char::is_whitespace) {
        if let Some(db_type) = DbType::parse(first) {
            return Command::Execute {
                query: rest.trim().to_string(),
                db_type,
            };
        }
    }
    Command::Execute {
        query: arg.to_string(),
        db_type: DbType::MySql,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_sent_verbatim() {
        assert_eq!(
            Command::parse("  show tables "),
            Command::Send("  show tables ".to_string())
        );
        assert_eq!(Command::parse(""), Command::Send(String::new()));
    }

    #[test]
    fn slash_commands_are_recognized() {
        assert_eq!(
            Command::parse("/file data/airtravel.csv"),
            Command::SelectFile(PathBuf::from("data/airtravel.csv"))
        );
        assert_eq!(Command::parse("/upload"), Command::Upload);
        assert_eq!(Command::parse("/clear-file"), Command::ClearFile);
        assert_eq!(Command::parse("/quit "), Command::Quit);
        assert_eq!(Command::parse("/file"), Command::Help);
        assert_eq!(Command::parse("/bogus"), Command::Help);
    }

    #[test]
    fn lookup_commands_carry_their_arguments() {
        assert_eq!(
            Command::parse("/explore MongoDB"),
            Command::Explore(DbType::MongoDb)
        );
        assert_eq!(Command::parse("/explore"), Command::Help);
        assert_eq!(
            Command::parse("/sql how many rows are in airtravel"),
            Command::Translate("how many rows are in airtravel".to_string())
        );
        assert_eq!(
            Command::parse("/execute mongodb db.airtravel.find()"),
            Command::Execute {
                query: "db.airtravel.find()".to_string(),
                db_type: DbType::MongoDb,
            }
        );
        assert_eq!(
            Command::parse("/execute SELECT * FROM airtravel"),
            Command::Execute {
                query: "SELECT * FROM airtravel".to_string(),
                db_type: DbType::MySql,
            }
        );
    }

    #[test]
    fn lookup_commands_map_to_requests() {
        assert_eq!(
            Command::Explore(DbType::MySql).into_msgs(),
            vec![Msg::ExploreRequested(DbType::MySql)]
        );
        assert_eq!(
            Command::Translate(String::new()).into_msgs(),
            vec![Msg::TranslateRequested(String::new())]
        );
    }

    #[test]
    fn send_types_then_clicks() {
        assert_eq!(
            Command::Send("Hello".to_string()).into_msgs(),
            vec![Msg::InputChanged("Hello".to_string()), Msg::SendClicked]
        );
        assert_eq!(
            Command::ClearFile.into_msgs(),
            vec![Msg::FilesSelected(Vec::new())]
        );
    }
}
