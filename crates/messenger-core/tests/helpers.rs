use messenger_core::{Chain, ChainConfig, Transaction};

pub fn message(sender: &str, receiver: &str, text: &str) -> Transaction {
    Transaction::new(sender, receiver, text)
}

/// A chain with one block per entry of `counts`, each carrying that many messages.
pub fn chain_with_counts(config: ChainConfig, counts: &[usize]) -> Chain {
    let mut chain = Chain::with_config(config);
    for (block, &n) in counts.iter().enumerate() {
        let txs = (0..n)
            .map(|i| message(&format!("user{block}"), &format!("user{i}"), "ping"))
            .collect();
        chain.append(txs).expect("append");
    }
    chain
}
