#![no_main]

use libfuzzer_sys::fuzz_target;
use replay::ranking::top_n_by;

fuzz_target!(|data: &[u8]| {
    let Some((&n, values)) = data.split_first() else {
        return;
    };
    let items: Vec<(usize, u8)> = values.iter().copied().enumerate().collect();
    let top = top_n_by(&items, usize::from(n % 32), |item| item.1);

    assert_eq!(top.len(), usize::from(n % 32).min(items.len()));
    assert!(top.windows(2).all(|pair| pair[0].1 >= pair[1].1));
});
