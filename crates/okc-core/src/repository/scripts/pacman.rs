use crate::script::{ChatEvent, Script, TaskEvent, TaskKind};

use super::{code, create_file, deploy, ms, read_todo, write_todo};

pub(crate) fn build() -> Script {
    Script {
        id: "pacman".to_string(),
        name: "Pacman Game".to_string(),
        query: "Create pacman game".to_string(),
        description: "A fully playable Pacman game using HTML5 Canvas and JavaScript".to_string(),
        total_duration: ms(60_000),
        chat: vec![ChatEvent::assistant(
            "msg2",
            "I'll create a Pacman game for you using HTML5 Canvas and JavaScript. This will be a fully playable version with all the classic elements you'd expect. Let me start by checking my current tasks and then begin the development process.",
            ms(500),
        )],
        tasks: vec![
            read_todo("t1", 2000),
            write_todo("t2", "Write Todo", 4000),
            create_file("t3", "game.js", 6000),
            create_file("t4", "styles.css", 15_000),
            create_file("t5", "index.html", 25_000),
            TaskEvent::new("t6", TaskKind::Thinking, "Analyzing game logic", ms(35_000)),
            write_todo("t7", "Update Todo", 45_000),
            deploy("t8", "Deploy completed Pacman game", 55_000),
        ],
        chunks: vec![code("game.js", include_str!("../../../assets/pacman/game.js"), 6000)],
        artifact: include_str!("../../../assets/pacman/index.html").to_string(),
    }
}
