use rand::Rng;

use super::Reply;

pub const GANDU: &str = "Sushant made emailora, and he will never let you forget it.";

pub const BAHUNKO: &str = "Dal bhat power, 24 hour. 🍛";

pub const NEP_QUOTES: &[&str] = &[
    "Jasko lathi, usko bhainsi. (Whoever holds the stick owns the buffalo.)",
    "Hune biruwa ko chillo pat. (A promising sapling shows in its glossy leaves.)",
    "Naachna najanne, aangan tedo. (The one who can't dance blames the crooked yard.)",
    "Aafno khutta ma aafai bancharo. (Taking the axe to your own foot.)",
    "Thopa thopa gardai samudra bancha. (Drop by drop, an ocean is made.)",
    "Dherai jogi bhela bhaye, math ma aago lagchha. (Too many hermits and the monastery burns.)",
];

pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs. 🐛",
    "I told my wifi we needed to talk. It dropped the connection. 📶",
    "Why did the subscriber cross the road? To get to the other newsletter. 📬",
    "There are 10 kinds of people: those who read binary and those who don't.",
    "My code never has bugs. It just develops random features. ✨",
];

pub const DIALOGUES: &[&str] = &[
    "Timi bina ma adhuro chhu, jasari chiya bina bihani. ☕",
    "Yo sahar le dherai dekhyo, tara maile jasto koi dekheko chhaina.",
    "Maya garne le maya paudaina, tara server le always ping paucha. 🏓",
    "Kasam khanchhu, yo release pachhi kunai bug hudaina.",
];

/// Uniform pick from a fixed, non-empty list.
pub fn pick<R: Rng + ?Sized>(list: &'static [&'static str], rng: &mut R) -> &'static str {
    list[rng.random_range(0..list.len())]
}

/// Commands answered from fixed text, with no data behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canned {
    Gandu,
    NepQuote,
    Hasayo,
    Bahunko,
    Dialogue,
}

pub fn respond(canned: Canned) -> Reply {
    respond_with(canned, &mut rand::rng())
}

pub fn respond_with<R: Rng + ?Sized>(canned: Canned, rng: &mut R) -> Reply {
    let text = match canned {
        Canned::Gandu => GANDU,
        Canned::Bahunko => BAHUNKO,
        Canned::NepQuote => pick(NEP_QUOTES, rng),
        Canned::Hasayo => pick(JOKES, rng),
        Canned::Dialogue => pick(DIALOGUES, rng),
    };
    Reply::text(text)
}
