use rayon::prelude::*;

pub fn map_parallel<T, R, F>(items: Vec<T>, jobs: Option<usize>, func: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    let count = match jobs {
        Some(count) if count > 1 => count,
        _ => return items.into_iter().map(func).collect(),
    };

    match rayon::ThreadPoolBuilder::new().num_threads(count).build() {
        Ok(pool) => pool.install(|| items.into_par_iter().map(func).collect()),
        Err(_) => items.into_iter().map(func).collect(),
    }
}
