use crate::script::{ChatEvent, Script};

use super::{code, create_file, deploy, ms, read_todo, write_todo};

pub(crate) fn build() -> Script {
    Script {
        id: "calculator".to_string(),
        name: "Calculator".to_string(),
        query: "Create calculator".to_string(),
        description: "A modern calculator with basic arithmetic operations".to_string(),
        total_duration: ms(45_000),
        chat: vec![ChatEvent::assistant(
            "msg2",
            "I'll build a sleek, modern calculator for you with all basic arithmetic operations. It will have a clean UI with number pad, operators, and a display. Let me get started!",
            ms(500),
        )],
        tasks: vec![
            read_todo("t1", 2000),
            write_todo("t2", "Write Todo", 3500),
            create_file("t3", "calculator.js", 5000),
            create_file("t4", "styles.css", 15_000),
            create_file("t5", "index.html", 25_000),
            deploy("t6", "Deploy completed Calculator", 40_000),
        ],
        chunks: vec![code("calculator.js", include_str!("../../../assets/calculator/calculator.js"), 5000)],
        artifact: include_str!("../../../assets/calculator/index.html").to_string(),
    }
}
