pub(crate) mod common;

#[cfg(test)]
mod test_battle_flow;



#[cfg(test)]
mod test_runner;
