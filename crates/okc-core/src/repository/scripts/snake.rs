use crate::script::{ChatEvent, Script};

use super::{code, create_file, deploy, ms, read_todo, write_todo};

pub(crate) fn build() -> Script {
    Script {
        id: "snake".to_string(),
        name: "Snake Game".to_string(),
        query: "Create snake game".to_string(),
        description: "Classic Snake game with growing snake and food".to_string(),
        total_duration: ms(50_000),
        chat: vec![ChatEvent::assistant(
            "msg2",
            "I'll build the classic Snake game for you! The snake will grow as it eats food, and the game ends if you hit the walls or yourself. Let me start coding this nostalgic game.",
            ms(500),
        )],
        tasks: vec![
            read_todo("t1", 2000),
            write_todo("t2", "Write Todo", 3500),
            create_file("t3", "snake.js", 5000),
            create_file("t4", "styles.css", 20_000),
            create_file("t5", "index.html", 30_000),
            deploy("t6", "Deploy completed Snake game", 45_000),
        ],
        chunks: vec![code("snake.js", include_str!("../../../assets/snake/snake.js"), 5000)],
        artifact: include_str!("../../../assets/snake/index.html").to_string(),
    }
}
