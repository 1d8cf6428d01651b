use crate::script::{ChatEvent, Script};

use super::{code, create_file, deploy, ms, read_todo, write_todo};

pub(crate) fn build() -> Script {
    Script {
        id: "xoxo".to_string(),
        name: "Tic Tac Toe".to_string(),
        query: "Create xoxo game".to_string(),
        description: "Classic Tic Tac Toe game for two players".to_string(),
        total_duration: ms(40_000),
        chat: vec![ChatEvent::assistant(
            "msg2",
            "I'll create a beautiful Tic Tac Toe (XOXO) game for two players! It will feature a clean design, win detection, and the ability to restart. Let's build it!",
            ms(500),
        )],
        tasks: vec![
            read_todo("t1", 2000),
            write_todo("t2", "Write Todo", 3500),
            create_file("t3", "game.js", 5000),
            create_file("t4", "index.html", 18_000),
            deploy("t5", "Deploy completed Tic Tac Toe", 35_000),
        ],
        chunks: vec![code("game.js", include_str!("../../../assets/xoxo/game.js"), 5000)],
        artifact: include_str!("../../../assets/xoxo/index.html").to_string(),
    }
}
