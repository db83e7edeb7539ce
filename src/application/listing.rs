use crate::domain::errors::DomainError;
use crate::domain::pagination::{Page, PageRequest, Window};

/// Run a windowed fetch and a total count against the same filter value.
///
/// The two passes are separate store calls; they agree on the record set
/// because they receive the identical filter, not because they share a
/// snapshot.
pub fn paginate<F, T>(
    request: PageRequest,
    filter: &F,
    fetch: impl FnOnce(&F, Window) -> Result<Vec<T>, DomainError>,
    count: impl FnOnce(&F) -> Result<i64, DomainError>,
) -> Result<Page<T>, DomainError> {
    let items = fetch(filter, request.window())?;
    let total_count = count(filter)?;
    Ok(Page {
        page: request.page,
        record_per_page: request.record_per_page,
        total_count,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn evens_up_to(n: i64) -> Vec<i64> {
        (0..n).filter(|x| x % 2 == 0).collect()
    }

    fn page_of(data: &[i64], request: PageRequest, modulus: &i64) -> Page<i64> {
        paginate(
            request,
            modulus,
            |m, window| {
                let filtered: Vec<i64> = data.iter().copied().filter(|x| x % m == 0).collect();
                Ok(window.slice(&filtered))
            },
            |m| Ok(data.iter().filter(|x| *x % m == 0).count() as i64),
        )
        .expect("paginate")
    }

    #[test]
    fn pages_partition_the_filtered_set() {
        let data: Vec<i64> = (0..57).collect();
        let expected = evens_up_to(57);
        let m = expected.len() as i64;
        let pages = (m + 9) / 10;

        let mut seen = Vec::new();
        for page in 1..=pages {
            let request = PageRequest::parse(Some(&page.to_string()), Some("10"));
            let result = page_of(&data, request, &2);
            assert_eq!(result.total_count, m);
            seen.extend(result.items);
        }
        assert_eq!(seen, expected);
        assert_eq!(seen.iter().collect::<HashSet<_>>().len(), seen.len());
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_total() {
        let data: Vec<i64> = (0..5).collect();
        let result = page_of(&data, PageRequest::parse(Some("4"), Some("10")), &1);
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 5);
        assert_eq!(result.page, 4);
    }

    #[test]
    fn count_failure_is_propagated() {
        let result: Result<Page<i64>, _> = paginate(
            PageRequest::default(),
            &(),
            |_, _| Ok(vec![1]),
            |_| Err(DomainError::Internal("count failed".to_string())),
        );
        assert!(matches!(result, Err(DomainError::Internal(_))));
    }
}
