//! Prompt templates for the summary and quiz generation calls.
//!
//! The model does all the classification and authoring; these templates only
//! state the output contract (heading rule, JSON schema, code-fence language
//! tags, TeX convention) and carry the note text. Keeping them here lets unit
//! tests assert on the contract without a live model.
//!
//! Both templates contain the literal placeholder [`NOTE_PLACEHOLDER`], which
//! is replaced with the caller's note text. `str::replace` is used rather than
//! `format!` because the quiz template embeds a JSON example full of braces.

/// Placeholder substituted with the note text.
pub const NOTE_PLACEHOLDER: &str = "{note_text}";

/// Suffix every summary title must end with: `## {title} 핵심 요약`.
pub const SUMMARY_HEADING_SUFFIX: &str = "핵심 요약";

/// Fenced code-block language tags allowed in coding-category questions.
pub const QUIZ_CODE_LANGUAGES: [&str; 4] = ["cpp", "python", "java", "c"];

/// Summary template. The first output line must be a level-2 heading whose
/// title the model derives from the material itself.
pub const SUMMARY_TEMPLATE: &str = r#"[역할]
당신은 복잡한 전공 지식을 명확하고 구조적으로 정리하는 기술 블로거입니다.

[목표]
아래 [자료]와 첨부된 이미지를 바탕으로, 독자가 개념을 쉽게 이해하고 참고할 수 있는 기술 요약 문서를 작성합니다. 노션(Notion)이나 기술 블로그에 그대로 게시할 수 있는 수준이어야 합니다.

[작성 규칙]
1. 제목: 문서의 첫 줄은 반드시 '## {title} 핵심 요약' 형식의 제목이어야 합니다. {title}은 [자료]의 핵심 주제를 보고 직접 정하세요.
2. 분량: 본문은 최소 20줄 이상으로 핵심 내용을 충분히 다루되, 불필요하게 길게 늘이지 마세요. 첨부 이미지가 많다면 그만큼 늘려도 됩니다.
3. 보강: [자료]에 빠진 내용이나 맥락상 잘못된 수식·설명이 있다면 정확한 정보로 보강하고, 중요한 보강에는 신뢰할 수 있는 논문이나 공식 문서 링크를 레퍼런스로 남기세요.
4. 언어: 본문은 한국어로 쓰되, 코드와 전공 용어(예: `Garbage Collection`, `Semaphore`)는 영어 원어를 그대로 사용하세요.
5. 수식: 수학 기호, 공식, 함수 식, 행렬, 점화식은 모두 TeX 문법으로 쓰고 앞뒤를 $ 기호로 감싸세요. (예: $O(n \log n)$)
6. 출력 형식: 결과는 마크다운 본문만 반환하세요. 응답 앞뒤에 ```markdown 이나 ``` 같은 코드 블록 표시를 붙이지 마세요.

[자료]
{note_text}
"#;

/// Quiz template. The model silently classifies the material as coding or
/// theory, applies the matching rule set, and answers with a JSON array.
pub const QUIZ_TEMPLATE: &str = r#"[역할]
당신은 컴퓨터 공학 강의 필기를 분석해 맞춤형 객관식 퀴즈를 만드는 AI 튜터입니다.

[목표]
아래 [강의 필기 내용]과 첨부된 이미지를 읽고, 핵심 주제를 스스로 판단하여 가장 알맞은 유형의 객관식 퀴즈 5개를 만듭니다.

[강의 필기 내용]
{note_text}

[생성 지침]
아래 단계를 반드시 순서대로 따르세요. 분류 결과는 출력하지 마세요.

1단계: 내용 분류
[강의 필기 내용]의 핵심 키워드를 보고 다음 두 유형 중 하나로 분류합니다.
- 유형 A (코딩/알고리즘): `알고리즘`, `자료구조`, `실습`, `정렬`, `탐색`, `재귀`, `클래스`, `객체`, `함수`, `포인터`, `C++`, `Java`, `Python` 같은 키워드가 주를 이루는 경우.
- 유형 B (컴퓨터 공학 이론): `운영체제(OS)`, `세마포어`, `뮤텍스`, `데드락`, `데이터베이스(DB)`, `정규화`, `트랜잭션`, `네트워크`, `TCP/IP`, `OSI 7계층` 같은 키워드가 주를 이루는 경우.

2단계: 유형별 규칙
- 규칙 A (유형 A):
  - 모든 문제는 C, C++, Python, Java 중 하나의 코드를 반드시 포함해야 합니다.
  - 실행 결과 예측, 빈칸 채우기, 버그 찾기 등 코드 중심 문제를 다양하게 출제하세요.
  - 코드는 반드시 코드 블록으로 제공하고, 코드 블록은 ```cpp, ```python, ```java, ```c 중 하나로 시작해야 합니다.
  - 수식, 정의, 함수 식, 점화식은 앞뒤를 $ 기호로 감싼 TeX 문법으로 작성하세요.
- 규칙 B (유형 B):
  - 코드를 절대 포함하지 않는 순수 개념 확인 문제만 출제하세요.
  - 용어 정의, 개념 간 비교, 프로세스 순서 등을 물어보세요.
  - 수식, 정의, 함수 식, 점화식은 앞뒤를 $ 기호로 감싼 TeX 문법으로 작성하세요.

3단계: 공통 규칙
1. 전체 결과는 반드시 유효한 JSON 배열 하나여야 합니다.
2. 각 원소는 `question`(문자열), `options`(정확히 5개의 문자열), `answerIndex`(0~4 정수), `explanation`(문자열) 키를 가집니다.
3. 내용이 모호하거나 유형 A와 B가 섞여 판단하기 어렵다면 규칙 B를 따르세요.
4. 서로 다른 문제 5개를 만들기 어렵다면 만들 수 있는 만큼(예: 3~4개)이라도 반드시 반환하세요. 빈 배열은 절대 반환하지 마세요.

[출력 예시]
결과는 아래 예시와 같은 구조여야 합니다.
[
    {
        "question": "다음은 너비 우선 탐색(BFS)을 C++로 구현한 코드입니다. 노드 1에서 노드 5까지의 최단 거리는 얼마인가요?\n\n```cpp\nvector<int> dist(n + 1, -1);\nqueue<int> q;\nq.push(1);\ndist[1] = 0;\nwhile (!q.empty()) {\n    int u = q.front(); q.pop();\n    for (int v : adj[u]) if (dist[v] == -1) { dist[v] = dist[u] + 1; q.push(v); }\n}\n```",
        "options": ["1", "2", "3", "4", "경로 없음"],
        "answerIndex": 1,
        "explanation": "BFS는 간선 가중치가 같을 때 최단 경로를 보장하며, 1 -> 2 -> 5 경로의 길이는 2입니다."
    },
    {
        "question": "데이터베이스 정규화에서 모든 속성 값이 원자(atomic) 값을 갖도록 하는 단계는 무엇인가요?",
        "options": ["제1정규형(1NF)", "제2정규형(2NF)", "제3정규형(3NF)", "BCNF", "비정규형"],
        "answerIndex": 0,
        "explanation": "제1정규형(1NF)은 모든 컬럼 값이 더 이상 분해할 수 없는 원자 값이어야 한다는 규칙입니다."
    }
]
"#;

/// Render the summary prompt for `note_text`.
pub fn summary_prompt(note_text: &str) -> String {
    SUMMARY_TEMPLATE.replace(NOTE_PLACEHOLDER, note_text)
}

/// Render the quiz prompt for `note_text`.
pub fn quiz_prompt(note_text: &str) -> String {
    QUIZ_TEMPLATE.replace(NOTE_PLACEHOLDER, note_text)
}
