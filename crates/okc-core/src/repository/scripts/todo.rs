use crate::script::{ChatEvent, Script};

use super::{code, create_file, deploy, ms, read_todo, write_todo};

pub(crate) fn build() -> Script {
    Script {
        id: "todo".to_string(),
        name: "Todo App".to_string(),
        query: "Create todo app".to_string(),
        description: "A simple todo list application with add, complete, and delete features".to_string(),
        total_duration: ms(40_000),
        chat: vec![ChatEvent::assistant(
            "msg2",
            "I'll create a clean, functional Todo app for you! It will allow you to add tasks, mark them as complete, and delete them. Let me build this productivity tool.",
            ms(500),
        )],
        tasks: vec![
            read_todo("t1", 2000),
            write_todo("t2", "Write Todo", 3500),
            create_file("t3", "app.js", 5000),
            create_file("t4", "index.html", 18_000),
            deploy("t5", "Deploy completed Todo App", 35_000),
        ],
        chunks: vec![code("app.js", include_str!("../../../assets/todo/app.js"), 5000)],
        artifact: include_str!("../../../assets/todo/index.html").to_string(),
    }
}
